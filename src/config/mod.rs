//! Configuration management
//!
//! Configuration comes from an optional YAML file with environment variables
//! layered on top (`.env` is honoured via `dotenvy`).

pub mod models;

pub use models::*;

use crate::utils::error::{GatekeeperError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Default location of the YAML configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/gatekeeper.yaml";

/// Main configuration struct
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub service: ServiceConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatekeeperError::Config(format!("Failed to read config file: {}", e)))?;

        let service: ServiceConfig = serde_yaml::from_str(&content)
            .map_err(|e| GatekeeperError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { service };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            service: ServiceConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// File (when present) overlaid with the environment
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let path = path.as_ref();

        let mut service = if tokio::fs::try_exists(path).await.unwrap_or(false) {
            info!("Loading configuration from: {:?}", path);
            let content = tokio::fs::read_to_string(path).await?;
            serde_yaml::from_str(&content)
                .map_err(|e| GatekeeperError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            info!("No configuration file at {:?}, using defaults", path);
            ServiceConfig::default()
        };
        service.apply_env()?;

        let config = Self { service };
        config.validate()?;
        Ok(config)
    }

    pub fn server(&self) -> &ServerConfig {
        &self.service.server
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.service.auth
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.service.storage
    }

    pub fn logging(&self) -> &LoggingConfig {
        &self.service.logging
    }

    pub fn seed(&self) -> &SeedConfig {
        &self.service.seed
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.service
            .server
            .validate()
            .map_err(|e| GatekeeperError::Config(format!("Server config error: {}", e)))?;

        self.service
            .auth
            .validate()
            .map_err(|e| GatekeeperError::Config(format!("Auth config error: {}", e)))?;

        self.service
            .storage
            .database
            .validate()
            .map_err(|e| GatekeeperError::Config(format!("Database config error: {}", e)))?;

        Ok(())
    }
}
