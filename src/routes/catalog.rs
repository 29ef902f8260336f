use actix_web::{web, HttpResponse, Responder};
use crate::error::RecommendError;
use crate::models::{ErrorResponse, ReloadResponse};
use crate::routes::{error_response, AppState};
use crate::services::load_catalog;

/// Configure catalog management routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/catalog/stats", web::get().to(catalog_stats))
        .route("/catalog/reload", web::post().to(reload_catalog));
}

/// GET /api/v1/catalog/stats
async fn catalog_stats(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.engine.current().statistics())
}

/// Re-read the catalog file and swap in a freshly fitted engine
///
/// POST /api/v1/catalog/reload
///
/// The current engine keeps serving if the new catalog is rejected.
async fn reload_catalog(state: web::Data<AppState>) -> impl Responder {
    let engine = state.engine.clone();
    let path = state.catalog_path.clone();

    let outcome = tokio::task::spawn_blocking(move || {
        let raw = load_catalog(&path).map_err(|e| RecommendError::DatasetSchema(e.violations()))?;
        engine.reload(raw)
    })
    .await;

    match outcome {
        Ok(Ok(report)) => HttpResponse::Ok().json(ReloadResponse {
            success: true,
            report,
        }),
        Ok(Err(e)) => {
            tracing::error!("Catalog reload failed: {}", e);
            error_response(&e)
        }
        Err(e) => {
            tracing::error!("Catalog reload task failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Catalog reload failed".to_string(),
                message: e.to_string(),
                status_code: 500,
                violations: Vec::new(),
            })
        }
    }
}
