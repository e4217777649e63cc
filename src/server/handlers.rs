//! HTTP route handlers

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::{debug, error};

/// Health check endpoint handler
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    debug!("Health check requested");

    match state.storage.health_check().await {
        Ok(()) => ApiResponse::ok(
            "Service is healthy",
            json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "version": env!("CARGO_PKG_VERSION")
            }),
        )
        .to_http_response(),
        Err(e) => {
            error!("Health check failed: {}", e);
            HttpResponse::ServiceUnavailable().finish()
        }
    }
}
