//! Configuration data models

#![allow(missing_docs)]

pub mod auth;
pub mod logging;
pub mod seed;
pub mod server;
pub mod service;
pub mod storage;

pub use auth::*;
pub use logging::*;
pub use seed::*;
pub use server::*;
pub use service::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    3000
}

/// Default timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

pub fn default_max_connections() -> u32 {
    10
}

pub fn default_connection_timeout() -> u64 {
    5
}

pub fn default_jwt_expiration() -> u64 {
    3600
}

pub fn default_refresh_expiration() -> u64 {
    7 * 24 * 3600
}

pub fn default_issuer() -> String {
    "gatekeeper".to_string()
}

pub fn default_database_url() -> String {
    "sqlite://data/gatekeeper.db?mode=rwc".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}
