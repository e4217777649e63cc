//! Utility modules shared across the service
//!
//! - **auth**: password hashing and secret generation
//! - **error**: the error type and its HTTP rendering

pub mod auth;
pub mod error;
