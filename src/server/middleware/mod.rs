//! HTTP middleware implementations
//!
//! - Request ID tracking
//! - Error envelope rendering
//! - Per-route access requirements

mod access;
mod error_envelope;
mod helpers;
mod request_id;

#[cfg(test)]
mod tests;

pub use access::{RequireAccess, RequireAccessService};
pub use error_envelope::{ErrorEnvelopeMiddleware, ErrorEnvelopeMiddlewareService};
pub use helpers::{bearer_header, request_id};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdMiddleware, RequestIdMiddlewareService};
