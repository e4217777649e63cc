//! Top-level service configuration

use super::*;
use crate::utils::error::{GatekeeperError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Service configuration as read from YAML
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl ServiceConfig {
    /// Defaults overlaid with environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay recognised environment variables onto this configuration
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable source
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_var("PORT", &port)?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.database.url = url;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(expiration) = lookup("JWT_EXPIRATION") {
            self.auth.jwt_expiration = parse_var("JWT_EXPIRATION", &expiration)?;
        }
        if let Some(expiration) = lookup("REFRESH_TOKEN_EXPIRATION") {
            self.auth.refresh_expiration = parse_var("REFRESH_TOKEN_EXPIRATION", &expiration)?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(on_startup) = lookup("SEED_ON_STARTUP") {
            self.seed.on_startup = parse_var("SEED_ON_STARTUP", &on_startup)?;
        }
        if let Some(dataset) = lookup("SEED_DATASET") {
            self.seed.dataset = Some(dataset.into());
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| GatekeeperError::config(format!("Invalid value for {}: {}", key, value)))
}
