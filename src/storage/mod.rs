//! Storage layer
//!
//! Durable state lives in a relational database accessed through SeaORM.

/// Database storage module
pub mod database;

use crate::config::StorageConfig;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::info;

/// Handle to every storage backend the service uses
#[derive(Debug, Clone)]
pub struct StorageLayer {
    /// Database connection pool
    pub database: Arc<database::Database>,
}

impl StorageLayer {
    /// Connect and bring the schema up to date
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        info!("Initializing storage layer");

        let database = database::Database::new(&config.database).await?;
        database.migrate().await?;

        info!("Storage layer initialized successfully");
        Ok(Self {
            database: Arc::new(database),
        })
    }

    /// Wrap an already connected database
    pub fn from_database(database: Arc<database::Database>) -> Self {
        Self { database }
    }

    /// Get database reference
    pub fn db(&self) -> &database::Database {
        &self.database
    }

    /// Check that the database answers
    pub async fn health_check(&self) -> Result<()> {
        self.database.ping().await
    }
}
