//! Authentication configuration

use super::*;
use crate::utils::auth::generate_secret;
use serde::{Deserialize, Serialize};

const PLACEHOLDER_SECRETS: &[&str] = &[
    "replace-with-a-long-random-secret-of-64-characters-or-more",
    "your-secret-key-change-this-in-production",
    "change-me-to-a-secure-random-secret-value",
];

/// Token signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 secret
    #[serde(default = "generated_secret")]
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: u64,
    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_expiration")]
    pub refresh_expiration: u64,
    /// `iss` claim written to and required on every token
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: generated_secret(),
            jwt_expiration: default_jwt_expiration(),
            refresh_expiration: default_refresh_expiration(),
            issuer: default_issuer(),
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long".to_string());
        }
        if PLACEHOLDER_SECRETS.contains(&self.jwt_secret.as_str()) {
            return Err("JWT secret must not use a placeholder value".to_string());
        }
        if self.jwt_expiration < 300 {
            return Err("JWT expiration should be at least 5 minutes (300 seconds)".to_string());
        }
        if self.jwt_expiration > 86400 * 30 {
            return Err("JWT expiration should not exceed 30 days".to_string());
        }
        if self.refresh_expiration < self.jwt_expiration {
            return Err("Refresh token must not expire before the access token".to_string());
        }
        if self.issuer.is_empty() {
            return Err("Issuer cannot be empty".to_string());
        }
        Ok(())
    }
}

// A fresh secret invalidates all tokens on restart; deployments set JWT_SECRET.
fn generated_secret() -> String {
    generate_secret(64)
}
