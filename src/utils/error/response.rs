//! HTTP response handling for errors

use super::types::GatekeeperError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

impl GatekeeperError {
    /// Message safe to show to callers; server-side detail stays in the logs
    pub fn public_message(&self) -> String {
        match self {
            GatekeeperError::Database(_) => "Database operation failed".to_string(),
            GatekeeperError::Config(_)
            | GatekeeperError::Io(_)
            | GatekeeperError::Serialization(_)
            | GatekeeperError::Yaml(_)
            | GatekeeperError::Crypto(_)
            | GatekeeperError::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl ResponseError for GatekeeperError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatekeeperError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            GatekeeperError::Forbidden(_) => StatusCode::FORBIDDEN,
            GatekeeperError::NotFound(_) => StatusCode::NOT_FOUND,
            GatekeeperError::Conflict(_) => StatusCode::CONFLICT,
            GatekeeperError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorEnvelope::new(status, self.public_message()))
    }
}

/// Standard error payload returned to callers
///
/// `path`, `method` and `request_id` are filled in by the error envelope
/// middleware, which knows the request the error belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    pub path: String,
    pub method: String,
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ErrorEnvelope {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code: status.as_u16(),
            message: message.into(),
            path: String::new(),
            method: String::new(),
            request_id: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Attach the request the error was raised for
    pub fn for_request(
        mut self,
        path: impl Into<String>,
        method: impl Into<String>,
        request_id: Option<String>,
    ) -> Self {
        self.path = path.into();
        self.method = method.into();
        self.request_id = request_id;
        self
    }
}
