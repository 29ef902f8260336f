use actix_web::{web, HttpResponse, Responder};
use crate::models::{ExplainServiceRequest, HealthResponse, RecommendationRequest};
use crate::routes::{error_response, AppState};

/// Configure all recommendation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/recommendations", web::post().to(recommend))
        .route("/recommendations/explain", web::post().to(explain_service));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let catalog_size = state.engine.current().catalog_size();
    let status = if catalog_size > 0 { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        catalog_size,
        timestamp: chrono::Utc::now(),
    })
}

/// Recommendations endpoint
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// {
///   "preferences": {
///     "businessType": "Technology",
///     "priceTier": "Low",
///     "languageSupport": "Both",
///     "locationArea": "Mumbai"
///   },
///   "count": 3,
///   "method": "weighted"
/// }
/// ```
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendationRequest>,
) -> impl Responder {
    let engine = state.engine.current();

    match engine.recommend(&req) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            tracing::info!("Recommendation request rejected: {}", e);
            error_response(&e)
        }
    }
}

/// Explain how one service matches a set of preferences
///
/// POST /api/v1/recommendations/explain
///
/// Request body:
/// ```json
/// {
///   "serviceId": "SRV001",
///   "preferences": { "businessType": "Retail", "priceTier": "Medium", "languageSupport": "Hindi", "locationArea": "Remote" }
/// }
/// ```
async fn explain_service(
    state: web::Data<AppState>,
    req: web::Json<ExplainServiceRequest>,
) -> impl Responder {
    let engine = state.engine.current();

    match engine.explain(&req) {
        Ok(scored) => HttpResponse::Ok().json(scored),
        Err(e) => {
            tracing::info!("Explain request for {} failed: {}", req.service_id, e);
            error_response(&e)
        }
    }
}
