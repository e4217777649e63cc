//! Helper functions for middleware

use super::request_id::RequestId;
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{HttpMessage, HttpRequest};

use crate::utils::error::GatekeeperError;

/// The request id assigned by [`super::RequestIdMiddleware`]
pub fn request_id(req: &HttpRequest) -> Option<String> {
    req.extensions().get::<RequestId>().map(|id| id.0.clone())
}

/// Raw `Authorization` header value, if present and readable
pub fn bearer_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok())
}

/// Message shown in the error envelope for a failed response
pub(super) fn envelope_message(status: StatusCode, error: Option<&actix_web::Error>) -> String {
    match error {
        Some(err) => match err.as_error::<GatekeeperError>() {
            Some(gatekeeper) => gatekeeper.public_message(),
            None if status.is_client_error() => err.to_string(),
            None => "Internal server error".to_string(),
        },
        None => status.canonical_reason().unwrap_or("Error").to_string(),
    }
}
