// Integration tests for the service recommender

use actix_web::{test, web, App};
use service_recommender::core::{EngineConfig, RankingMethod, RecommendationEngine};
use service_recommender::error::RecommendError;
use service_recommender::models::{
    CatalogStatistics, ErrorResponse, MatchQuality, RawServiceRecord, RecommendationRequest,
    RecommendationResponse, ScoredRecommendation, UserPreferences,
};
use service_recommender::routes::{configure_routes, AppState};
use service_recommender::services::{read_catalog, EngineHandle};
use std::sync::Arc;

const CATALOG_CSV: &str = "\
Service_ID,Service_Name,Target_Business_Type,Price_Category,Language_Support,Location_Area,Description
SRV001,Professional Web Design,Technology,Low,Both,Mumbai,Modern responsive websites for growing businesses
SRV002,Cloud Hosting Pro,Technology,High,English,Delhi,Managed cloud infrastructure with round the clock support
SRV003,Retail POS System,Retail,Medium,Hindi,Remote,Point of sale software built for neighbourhood stores
SRV004,Digital Marketing Suite,Technology,Low,Both,Mumbai,Social media campaigns and search marketing for startups
";

fn create_raw(id: &str, business: &str, price: &str, language: &str, location: &str) -> RawServiceRecord {
    RawServiceRecord {
        service_id: Some(id.to_string()),
        name: Some(format!("{} offering", business)),
        business_type: Some(business.to_string()),
        price_tier: Some(price.to_string()),
        language: Some(language.to_string()),
        location: Some(location.to_string()),
        description: Some("Hands-on help delivered by an experienced team".to_string()),
    }
}

fn seeded_config(seed: u64) -> EngineConfig {
    EngineConfig {
        explanation_seed: Some(seed),
        ..EngineConfig::default()
    }
}

fn scenario_engine() -> RecommendationEngine {
    let raw = read_catalog(CATALOG_CSV.as_bytes()).unwrap();
    RecommendationEngine::build(raw, seeded_config(7)).unwrap()
}

fn technology_preferences() -> UserPreferences {
    UserPreferences::new("Technology", "Low", "Both", "Mumbai")
}

#[::core::prelude::v1::test]
fn test_integration_end_to_end_weighted() {
    let engine = scenario_engine();
    let request = RecommendationRequest::new(technology_preferences())
        .with_count(3)
        .with_method("weighted");

    let response = engine.recommend(&request).unwrap();
    let ids: Vec<&str> = response
        .recommendations
        .iter()
        .map(|r| r.service_id.as_str())
        .collect();

    // Both full matches first in catalog order, the retail entry left out
    assert_eq!(ids, vec!["SRV001", "SRV004", "SRV002"]);
    for rec in &response.recommendations[..2] {
        assert!((rec.similarity_score - 1.0).abs() < 1e-9);
        assert_eq!(rec.match_quality, MatchQuality::High);
        assert!(!rec.explanation.is_empty());
    }
    assert_eq!(
        response.summary.top_recommendation.as_deref(),
        Some("Professional Web Design")
    );
}

#[::core::prelude::v1::test]
fn test_all_rows_returned_when_count_covers_catalog() {
    let engine = scenario_engine();
    let response = engine
        .recommend(&RecommendationRequest::new(technology_preferences()).with_count(5))
        .unwrap();

    assert_eq!(response.recommendations.len(), 4);
    let last = response.recommendations.last().unwrap();
    assert_eq!(last.service_id, "SRV003");
    assert_eq!(last.similarity_score, 0.0);
}

#[::core::prelude::v1::test]
fn test_every_method_ranks_exact_match_first() {
    let engine = scenario_engine();

    for method in RankingMethod::ALL {
        let response = engine
            .recommend(
                &RecommendationRequest::new(technology_preferences())
                    .with_count(1)
                    .with_method(method.as_str()),
            )
            .unwrap();
        assert_eq!(response.recommendations[0].service_id, "SRV001", "method {}", method);
        assert_eq!(response.method, method.as_str());
    }
}

#[::core::prelude::v1::test]
fn test_unknown_category_still_returns_results() {
    let engine = scenario_engine();
    let preferences = UserPreferences::new("Aviation", "Low", "Both", "Mumbai");

    for method in RankingMethod::ALL {
        let response = engine
            .recommend(
                &RecommendationRequest::new(preferences.clone())
                    .with_count(3)
                    .with_method(method.as_str()),
            )
            .unwrap();

        assert_eq!(response.recommendations.len(), 3);
        assert!(response
            .recommendations
            .iter()
            .all(|r| r.match_score < 1.0 && r.match_score >= 0.0));
    }
}

#[::core::prelude::v1::test]
fn test_synonyms_in_preferences_match_canonical_catalog() {
    let engine = scenario_engine();
    let preferences = UserPreferences::new("technology", "cheap", "bilingual", "mumbai");

    let response = engine
        .recommend(&RecommendationRequest::new(preferences).with_count(1))
        .unwrap();

    assert_eq!(response.recommendations[0].match_score, 1.0);
}

#[::core::prelude::v1::test]
fn test_validation_lists_every_violation() {
    let engine = scenario_engine();
    let preferences = UserPreferences::new("", "Low", " ", "");

    let err = engine
        .recommend(&RecommendationRequest::new(preferences).with_count(0))
        .unwrap_err();

    match err {
        RecommendError::Validation(violations) => assert_eq!(violations.len(), 4, "{:?}", violations),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[::core::prelude::v1::test]
fn test_inverted_budget_rejected() {
    let engine = scenario_engine();
    let mut preferences = technology_preferences();
    preferences.budget_min = Some(500.0);
    preferences.budget_max = Some(100.0);

    let err = engine
        .recommend(&RecommendationRequest::new(preferences))
        .unwrap_err();

    assert!(matches!(err, RecommendError::Validation(_)));
    assert!(err.violations()[0].contains("budget"));
}

#[::core::prelude::v1::test]
fn test_seeded_explanations_are_reproducible() {
    let request = RecommendationRequest::new(technology_preferences()).with_count(4);

    let first = scenario_engine().recommend(&request).unwrap();
    let second = scenario_engine().recommend(&request).unwrap();

    let texts = |r: &RecommendationResponse| -> Vec<String> {
        r.recommendations.iter().map(|s| s.explanation.clone()).collect()
    };
    assert_eq!(texts(&first), texts(&second));
    assert_eq!(first.summary.insight, second.summary.insight);
}

#[::core::prelude::v1::test]
fn test_prefilter_narrows_then_falls_back() {
    let raw = vec![
        create_raw("A", "Retail", "Low", "Both", "Mumbai"),
        create_raw("B", "Technology", "High", "Hindi", "Delhi"),
        create_raw("C", "Retail", "Medium", "English", "Pune"),
    ];
    let config = EngineConfig {
        prefilter_business_type: true,
        ..seeded_config(3)
    };
    let engine = RecommendationEngine::build(raw, config).unwrap();

    let narrowed = engine
        .recommend(&RecommendationRequest::new(UserPreferences::new("Retail", "Low", "Both", "Mumbai")).with_count(5))
        .unwrap();
    assert_eq!(narrowed.recommendations.len(), 2);

    let fallback = engine
        .recommend(&RecommendationRequest::new(UserPreferences::new("Aviation", "Low", "Both", "Mumbai")).with_count(5))
        .unwrap();
    assert_eq!(fallback.recommendations.len(), 3);
}

fn create_app_state() -> AppState {
    let raw = read_catalog(CATALOG_CSV.as_bytes()).unwrap();
    AppState {
        engine: Arc::new(EngineHandle::build(raw, seeded_config(11)).unwrap()),
        catalog_path: "does/not/exist.csv".to_string(),
    }
}

#[actix_web::test]
async fn test_http_recommendations_round_trip() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(create_app_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations")
        .set_json(serde_json::json!({
            "preferences": {
                "businessType": "Technology",
                "priceTier": "Low",
                "languageSupport": "Both",
                "locationArea": "Mumbai"
            },
            "count": 2,
            "method": "cosine"
        }))
        .to_request();

    let resp: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(resp["method"], "cosine");
    assert_eq!(resp["recommendations"].as_array().unwrap().len(), 2);
    assert_eq!(resp["recommendations"][0]["serviceId"], "SRV001");
    assert_eq!(resp["summary"]["totalRecommendations"], 2);
    assert_eq!(resp["summary"]["qualityDistribution"]["High"], 2);
    assert!(resp["requestId"].as_str().is_some_and(|id| !id.is_empty()));
}

#[actix_web::test]
async fn test_http_rejects_unknown_method() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(create_app_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations")
        .set_json(serde_json::json!({
            "preferences": {
                "businessType": "Technology",
                "priceTier": "Low",
                "languageSupport": "Both",
                "locationArea": "Mumbai"
            },
            "method": "pagerank"
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: ErrorResponse = test::read_body_json(resp).await;
    assert!(body.message.contains("pagerank"));
}

#[actix_web::test]
async fn test_http_explain_and_stats() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(create_app_state()))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/recommendations/explain")
        .set_json(serde_json::json!({
            "serviceId": "SRV003",
            "preferences": {
                "businessType": "Retail",
                "priceTier": "Medium",
                "languageSupport": "Hindi",
                "locationArea": "Remote"
            }
        }))
        .to_request();
    let scored: ScoredRecommendation = test::call_and_read_body_json(&app, req).await;
    assert_eq!(scored.match_score, 1.0);
    assert!(scored.explanation.contains("remote service available"));

    let missing = test::TestRequest::post()
        .uri("/api/v1/recommendations/explain")
        .set_json(serde_json::json!({
            "serviceId": "SRV999",
            "preferences": {
                "businessType": "Retail",
                "priceTier": "Medium",
                "languageSupport": "Hindi",
                "locationArea": "Remote"
            }
        }))
        .to_request();
    assert_eq!(test::call_service(&app, missing).await.status(), 404);

    let req = test::TestRequest::get().uri("/api/v1/catalog/stats").to_request();
    let stats: CatalogStatistics = test::call_and_read_body_json(&app, req).await;
    assert_eq!(stats.total_services, 4);
    assert_eq!(stats.business_types, 2);
}

#[actix_web::test]
async fn test_http_failed_reload_keeps_serving() {
    let state = create_app_state();
    let handle = state.engine.clone();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/v1/catalog/reload").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    assert_eq!(handle.current().catalog_size(), 4);
}
