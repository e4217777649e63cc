//! Seeding configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SeedConfig {
    /// Apply the seed dataset when the server starts
    #[serde(default)]
    pub on_startup: bool,
    /// YAML dataset to load instead of the built-in one
    #[serde(default)]
    pub dataset: Option<PathBuf>,
}
