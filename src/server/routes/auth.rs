//! Login, token renewal and the current identity

use crate::auth::Identity;
use crate::server::middleware::RequireAccess;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Deserialize;

/// Configure authentication routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/refresh-token", web::post().to(refresh_token))
            .service(
                web::resource("/me")
                    .route(web::get().to(me))
                    .wrap(RequireAccess::identity()),
            ),
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email or username
    #[serde(alias = "email", alias = "username")]
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    let response = state
        .auth
        .login(&request.identifier, &request.password)
        .await?;
    Ok(ApiResponse::ok("Login successful", response).to_http_response())
}

async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshRequest>,
) -> ActixResult<HttpResponse> {
    let tokens = state.auth.refresh(&request.refresh_token).await?;
    Ok(ApiResponse::ok("Token refreshed", tokens).to_http_response())
}

async fn me(identity: Identity) -> HttpResponse {
    ApiResponse::ok("Current user", identity).to_http_response()
}
