// Route exports
pub mod catalog;
pub mod recommendations;

use actix_web::{web, HttpResponse};
use crate::error::RecommendError;
use crate::models::ErrorResponse;
use crate::services::EngineHandle;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<EngineHandle>,
    /// Catalog file re-read on reload
    pub catalog_path: String,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(recommendations::configure)
            .configure(catalog::configure),
    );
}

/// Map a pipeline error onto an HTTP response
pub fn error_response(err: &RecommendError) -> HttpResponse {
    let (error, status) = match err {
        RecommendError::Validation(_) => ("Validation failed", 400),
        RecommendError::UnknownMethod(_) => ("Unknown ranking method", 400),
        RecommendError::ServiceNotFound(_) => ("Service not found", 404),
        RecommendError::DatasetSchema(_) => ("Invalid catalog", 500),
        RecommendError::CatalogTooLarge { .. } => ("Catalog too large", 500),
        RecommendError::Configuration(_) => ("Configuration error", 500),
        RecommendError::NotFitted => ("Engine not ready", 500),
    };

    let body = ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code: status,
        violations: err.violations().to_vec(),
    };

    match status {
        400 => HttpResponse::BadRequest().json(body),
        404 => HttpResponse::NotFound().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}
