//! HTTP route modules
//!
//! Every guarded resource declares its [`RequireAccess`](super::middleware::RequireAccess)
//! requirement where it is registered.

pub mod auth;
pub mod permissions;
pub mod roles;
pub mod users;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::web;
use serde::Serialize;

/// Configure every API route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(auth::configure_routes)
        .configure(roles::configure_routes)
        .configure(permissions::configure_routes)
        .configure(users::configure_routes);
}

/// Standard API response structure
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Always true; failures use the error envelope
    pub success: bool,
    pub status_code: u16,
    pub message: String,
    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Pagination metadata for list responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    fn with_status(status: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            status_code: status.as_u16(),
            message: message.into(),
            data,
            meta: None,
        }
    }

    /// 200 with data
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::OK, message, Some(data))
    }

    /// 201 with the created resource
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_status(StatusCode::CREATED, message, Some(data))
    }

    /// 200 with one page of items
    pub fn paginated(message: impl Into<String>, data: T, meta: PaginationMeta) -> Self {
        Self {
            meta: Some(meta),
            ..Self::ok(message, data)
        }
    }

    /// Convert the API response to an HTTP response
    pub fn to_http_response(&self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        HttpResponse::build(status).json(self)
    }
}

impl ApiResponse<()> {
    /// 200 without data
    pub fn message(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, message, None)
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number
    pub page: u64,
    /// Number of items per page
    pub limit: u64,
    /// Total number of items
    pub total: u64,
    /// Total number of pages
    pub pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let page = page.max(1);
        let limit = limit.clamp(1, 100);
        let pages = total.div_ceil(limit);

        Self {
            page,
            limit,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}
