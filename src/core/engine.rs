//! Recommendation pipeline orchestration.
//!
//! A [`RecommendationEngine`] is built once per catalog snapshot: the raw
//! records are normalized, the encoder is fitted, the catalog is encoded
//! and the ranking structures are precomputed. After that every request is
//! a read-only computation over the engine, so one engine can serve any
//! number of concurrent requests.

use crate::core::encoder::{standardize, CategoryEncoder};
use crate::core::explanation::{mean_match_score, ExplanationGenerator};
use crate::core::normalizer::{CleaningReport, Normalizer};
use crate::core::ranking::{RankingEngine, RankingMethod, UserVector};
use crate::core::scoring::{QualityClassifier, QualityThresholds};
use crate::error::RecommendError;
use crate::models::{
    Attribute, AttributeWeights, CatalogStatistics, ExplainServiceRequest, MatchQuality,
    RawServiceRecord, RecommendationRequest, RecommendationResponse, RecommendationSummary,
    ScoredRecommendation, UserPreferences,
};
use std::collections::{BTreeMap, BTreeSet};
use validator::Validate;

/// Allowed distance of the weight sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-3;

/// Everything the pipeline needs besides the catalog itself
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Categorical attributes used for encoding and matching, in vector order
    pub attributes: Vec<Attribute>,
    pub weights: AttributeWeights,
    pub thresholds: QualityThresholds,
    pub default_method: RankingMethod,
    pub default_count: usize,
    /// Soft cap, larger requested counts are clamped
    pub max_count: usize,
    pub prefilter_business_type: bool,
    pub max_catalog_size: usize,
    /// Seed for explanation template selection
    pub explanation_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            attributes: Attribute::ALL.to_vec(),
            weights: AttributeWeights::default(),
            thresholds: QualityThresholds::default(),
            default_method: RankingMethod::Weighted,
            default_count: 3,
            max_count: 10,
            prefilter_business_type: false,
            max_catalog_size: 10_000,
            explanation_seed: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), RecommendError> {
        if self.attributes.is_empty() {
            return Err(RecommendError::Configuration(
                "at least one categorical attribute is required".to_string(),
            ));
        }

        let distinct: BTreeSet<_> = self.attributes.iter().collect();
        if distinct.len() != self.attributes.len() {
            return Err(RecommendError::Configuration(
                "categorical attributes must not repeat".to_string(),
            ));
        }

        if let Some(attr) = self.attributes.iter().find(|a| {
            let w = self.weights.weight(**a);
            !w.is_finite() || w < 0.0
        }) {
            return Err(RecommendError::Configuration(format!(
                "weight for {} must be a non-negative number",
                attr
            )));
        }

        let total = self.weights.total(&self.attributes);
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(RecommendError::Configuration(format!(
                "attribute weights must sum to 1.0, got {:.4}",
                total
            )));
        }

        self.thresholds.validate()?;

        if self.default_count == 0 || self.default_count > self.max_count {
            return Err(RecommendError::Configuration(format!(
                "default count {} must be between 1 and max count {}",
                self.default_count, self.max_count
            )));
        }

        if self.max_catalog_size == 0 {
            return Err(RecommendError::Configuration(
                "max catalog size must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Fitted pipeline over one catalog snapshot
#[derive(Debug)]
pub struct RecommendationEngine {
    config: EngineConfig,
    encoder: CategoryEncoder,
    ranking: RankingEngine,
    classifier: QualityClassifier,
    explainer: ExplanationGenerator,
    report: CleaningReport,
}

impl RecommendationEngine {
    /// Normalize, fit, encode and index a raw catalog
    pub fn build(raw: Vec<RawServiceRecord>, config: EngineConfig) -> Result<Self, RecommendError> {
        config.validate()?;

        if raw.is_empty() {
            return Err(RecommendError::DatasetSchema(vec![
                "dataset contains no records".to_string(),
            ]));
        }

        if raw.len() > config.max_catalog_size {
            return Err(RecommendError::CatalogTooLarge {
                size: raw.len(),
                limit: config.max_catalog_size,
            });
        }

        let (records, report) = Normalizer::new().normalize(raw);
        if records.is_empty() {
            return Err(RecommendError::DatasetSchema(vec![
                "no valid records remain after cleaning".to_string(),
            ]));
        }

        let mut encoder = CategoryEncoder::new();
        let catalog = encoder.fit_transform(records, &config.attributes)?;
        let ranking = RankingEngine::new(catalog, config.weights);
        let classifier = QualityClassifier::new(config.attributes.clone(), config.thresholds);
        let explainer = ExplanationGenerator::new(config.attributes.clone(), config.explanation_seed);

        tracing::info!(
            services = ranking.catalog().len(),
            attributes = config.attributes.len(),
            default_method = %config.default_method,
            "Recommendation engine ready"
        );

        Ok(Self {
            config,
            encoder,
            ranking,
            classifier,
            explainer,
            report,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn encoder(&self) -> &CategoryEncoder {
        &self.encoder
    }

    pub fn ranking(&self) -> &RankingEngine {
        &self.ranking
    }

    pub fn cleaning_report(&self) -> &CleaningReport {
        &self.report
    }

    pub fn catalog_size(&self) -> usize {
        self.ranking.catalog().len()
    }

    /// Ranked, scored and explained shortlist for one request
    ///
    /// Validation runs before any scoring. Unknown categorical values are
    /// not errors; they encode to the unknown sentinel and score poorly.
    pub fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResponse, RecommendError> {
        request.validate()?;

        let method = self.resolve_method(request.method.as_deref())?;
        let count = self.resolve_count(request.count);

        let preferences = standardize(&request.preferences);
        let user = UserVector::new(self.encoder.encode_preferences(&preferences)?);

        let ranked = self.ranking.rank(
            &preferences,
            &user,
            count,
            method,
            self.config.prefilter_business_type,
        );

        let recommendations: Vec<ScoredRecommendation> = ranked
            .iter()
            .map(|r| self.score_row(&preferences, r.row, r.score))
            .collect();

        let summary = self.summarize(&recommendations, &preferences);
        let request_id = uuid::Uuid::new_v4().to_string();

        tracing::info!(
            request_id = %request_id,
            method = %method,
            requested = count,
            returned = recommendations.len(),
            average_score = summary.average_match_score,
            "Served recommendations"
        );

        Ok(RecommendationResponse {
            request_id,
            method: method.to_string(),
            recommendations,
            summary,
        })
    }

    /// Validate an explain request and score the named service
    pub fn explain(&self, request: &ExplainServiceRequest) -> Result<ScoredRecommendation, RecommendError> {
        request.validate()?;
        self.explain_service(&request.service_id, &request.preferences)
    }

    /// Score a single catalog entry against a preference set
    ///
    /// Uses the weighted method, so the raw similarity is the sum of the
    /// weights of the matching attributes.
    pub fn explain_service(
        &self,
        service_id: &str,
        preferences: &UserPreferences,
    ) -> Result<ScoredRecommendation, RecommendError> {
        preferences.validate()?;

        let service_id = service_id.trim();
        let row = self
            .ranking
            .catalog()
            .position(service_id)
            .ok_or_else(|| RecommendError::ServiceNotFound(service_id.to_string()))?;

        let preferences = standardize(preferences);
        let user = UserVector::new(self.encoder.encode_preferences(&preferences)?);
        let raw = self.ranking.score_row(RankingMethod::Weighted, row, &user);

        tracing::debug!(service_id, raw_similarity = raw, "Explained single service");

        Ok(self.score_row(&preferences, row, raw))
    }

    /// Descriptive statistics over the cleaned catalog
    pub fn statistics(&self) -> CatalogStatistics {
        let records = self.ranking.catalog().records();

        let business_types: BTreeSet<&str> = records.iter().map(|r| r.business_type.as_str()).collect();
        let locations: BTreeSet<&str> = records.iter().map(|r| r.location.as_str()).collect();

        let mut price_categories = BTreeMap::new();
        let mut language_support = BTreeMap::new();
        for record in records {
            *price_categories.entry(record.price_tier.clone()).or_insert(0) += 1;
            *language_support.entry(record.language.clone()).or_insert(0) += 1;
        }

        CatalogStatistics {
            total_services: records.len(),
            original_services: self.report.original_records,
            business_types: business_types.len(),
            price_categories,
            language_support,
            locations: locations.len(),
            cleaning_report: self.report.clone(),
        }
    }

    fn resolve_method(&self, requested: Option<&str>) -> Result<RankingMethod, RecommendError> {
        match requested {
            Some(name) if !name.trim().is_empty() => name.parse(),
            _ => Ok(self.config.default_method),
        }
    }

    fn resolve_count(&self, requested: Option<usize>) -> usize {
        let count = requested.unwrap_or(self.config.default_count);
        if count > self.config.max_count {
            tracing::debug!(requested = count, max = self.config.max_count, "Clamped result count");
        }
        count.min(self.config.max_count)
    }

    fn score_row(&self, preferences: &UserPreferences, row: usize, raw: f64) -> ScoredRecommendation {
        let record = &self.ranking.catalog().records()[row];
        let match_score = self.classifier.score(preferences, record, raw);
        let tier = self.classifier.classify(match_score);
        let explanation = self.explainer.explain(preferences, record, match_score, tier);

        ScoredRecommendation::from_record(record, raw, match_score, tier, explanation)
    }

    fn summarize(
        &self,
        recommendations: &[ScoredRecommendation],
        preferences: &UserPreferences,
    ) -> RecommendationSummary {
        let mut quality_distribution: BTreeMap<MatchQuality, usize> =
            [MatchQuality::High, MatchQuality::Medium, MatchQuality::Low]
                .into_iter()
                .map(|q| (q, 0))
                .collect();
        for rec in recommendations {
            *quality_distribution.entry(rec.match_quality).or_insert(0) += 1;
        }

        RecommendationSummary {
            total_recommendations: recommendations.len(),
            average_match_score: mean_match_score(recommendations),
            quality_distribution,
            top_recommendation: recommendations.first().map(|r| r.name.clone()),
            insight: self.explainer.summarize(recommendations, preferences),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, business: &str, price: &str, language: &str, location: &str) -> RawServiceRecord {
        RawServiceRecord {
            service_id: Some(id.to_string()),
            name: Some(format!("{} service {}", business, id)),
            business_type: Some(business.to_string()),
            price_tier: Some(price.to_string()),
            language: Some(language.to_string()),
            location: Some(location.to_string()),
            description: Some(format!("Dependable {} support for growing teams", business)),
        }
    }

    fn scenario() -> Vec<RawServiceRecord> {
        vec![
            raw("S1", "Technology", "Low", "Both", "Mumbai"),
            raw("S2", "Technology", "High", "English", "Delhi"),
            raw("S3", "Retail", "Medium", "Hindi", "Remote"),
            raw("S4", "Technology", "Low", "Both", "Mumbai"),
        ]
    }

    fn seeded_config() -> EngineConfig {
        EngineConfig {
            explanation_seed: Some(42),
            ..EngineConfig::default()
        }
    }

    fn preferences() -> UserPreferences {
        UserPreferences::new("Technology", "Low", "Both", "Mumbai")
    }

    #[test]
    fn test_weighted_scenario() {
        let engine = RecommendationEngine::build(scenario(), seeded_config()).unwrap();
        let request = RecommendationRequest::new(preferences())
            .with_count(3)
            .with_method("weighted");

        let response = engine.recommend(&request).unwrap();
        let ids: Vec<&str> = response.recommendations.iter().map(|r| r.service_id.as_str()).collect();

        assert_eq!(ids, vec!["S1", "S4", "S2"]);
        assert!((response.recommendations[0].similarity_score - 1.0).abs() < 1e-9);
        assert_eq!(response.recommendations[0].match_score, 1.0);
        assert_eq!(response.recommendations[0].match_quality, MatchQuality::High);
        assert_eq!(response.method, "weighted");
    }

    #[test]
    fn test_summary_fields() {
        let engine = RecommendationEngine::build(scenario(), seeded_config()).unwrap();
        let response = engine
            .recommend(&RecommendationRequest::new(preferences()).with_count(4))
            .unwrap();

        let summary = &response.summary;
        assert_eq!(summary.total_recommendations, 4);
        assert_eq!(summary.quality_distribution[&MatchQuality::High], 2);
        assert_eq!(summary.quality_distribution[&MatchQuality::Low], 2);
        assert_eq!(summary.top_recommendation.as_deref(), Some("Technology Service S1"));
        assert!(summary.insight.contains("2 out of 4 are high-quality matches."));
    }

    #[test]
    fn test_unknown_method_rejected() {
        let engine = RecommendationEngine::build(scenario(), seeded_config()).unwrap();
        let request = RecommendationRequest::new(preferences()).with_method("pagerank");

        assert_eq!(
            engine.recommend(&request).unwrap_err(),
            RecommendError::UnknownMethod("pagerank".to_string())
        );
    }

    #[test]
    fn test_validation_runs_before_method_parsing() {
        let engine = RecommendationEngine::build(scenario(), seeded_config()).unwrap();
        let request = RecommendationRequest::new(UserPreferences::new("", "Low", "Both", "Mumbai"))
            .with_method("pagerank");

        let err = engine.recommend(&request).unwrap_err();
        assert!(matches!(err, RecommendError::Validation(_)));
    }

    #[test]
    fn test_count_defaults_and_soft_cap() {
        let records: Vec<RawServiceRecord> = (0..15)
            .map(|i| raw(&format!("S{}", i), "Technology", "Low", "Both", "Mumbai"))
            .collect();
        let engine = RecommendationEngine::build(records, seeded_config()).unwrap();

        let default = engine.recommend(&RecommendationRequest::new(preferences())).unwrap();
        assert_eq!(default.recommendations.len(), 3);

        let capped = engine
            .recommend(&RecommendationRequest::new(preferences()).with_count(50))
            .unwrap();
        assert_eq!(capped.recommendations.len(), 10);
    }

    #[test]
    fn test_build_rejects_empty_catalog() {
        let err = RecommendationEngine::build(Vec::new(), EngineConfig::default()).unwrap_err();
        assert!(matches!(err, RecommendError::DatasetSchema(_)));
    }

    #[test]
    fn test_build_rejects_fully_invalid_catalog() {
        let mut record = raw("S1", "Technology", "Bogus", "Both", "Mumbai");
        record.description = Some("tiny".to_string());

        let err = RecommendationEngine::build(vec![record], EngineConfig::default()).unwrap_err();
        assert!(matches!(err, RecommendError::DatasetSchema(_)));
    }

    #[test]
    fn test_build_enforces_catalog_limit() {
        let config = EngineConfig {
            max_catalog_size: 2,
            ..EngineConfig::default()
        };
        assert_eq!(
            RecommendationEngine::build(scenario(), config).unwrap_err(),
            RecommendError::CatalogTooLarge { size: 4, limit: 2 }
        );
    }

    #[test]
    fn test_config_rejects_unbalanced_weights() {
        let config = EngineConfig {
            weights: AttributeWeights {
                business_type: 0.5,
                price_tier: 0.5,
                language: 0.5,
                location: 0.5,
            },
            ..EngineConfig::default()
        };
        assert!(matches!(config.validate(), Err(RecommendError::Configuration(_))));
    }

    #[test]
    fn test_config_weights_follow_attribute_subset() {
        let config = EngineConfig {
            attributes: vec![Attribute::BusinessType, Attribute::PriceTier],
            weights: AttributeWeights {
                business_type: 0.6,
                price_tier: 0.4,
                language: 0.0,
                location: 0.0,
            },
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explain_service() {
        let engine = RecommendationEngine::build(scenario(), seeded_config()).unwrap();

        let scored = engine.explain_service("S2", &preferences()).unwrap();
        assert!((scored.similarity_score - 0.35).abs() < 1e-9);
        assert!((scored.match_score - 0.40).abs() < 1e-9);
        assert_eq!(scored.match_quality, MatchQuality::Low);
        assert!(scored.explanation.contains("Matches your business type requirement (Technology)."));

        assert_eq!(
            engine.explain_service("S99", &preferences()).unwrap_err(),
            RecommendError::ServiceNotFound("S99".to_string())
        );
    }

    #[test]
    fn test_statistics() {
        let engine = RecommendationEngine::build(scenario(), seeded_config()).unwrap();
        let stats = engine.statistics();

        assert_eq!(stats.total_services, 4);
        assert_eq!(stats.original_services, 4);
        assert_eq!(stats.business_types, 2);
        assert_eq!(stats.locations, 3);
        assert_eq!(stats.price_categories.get("Low"), Some(&2));
        assert_eq!(stats.language_support.get("Hindi"), Some(&1));
    }
}
