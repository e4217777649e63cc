//! # Gatekeeper
//!
//! User accounts and role-based access control behind JWT authentication.
//!
//! ## Features
//!
//! - **Entity store**: users, roles, permissions and role bindings in SQLite or PostgreSQL
//! - **Identity resolution**: bearer tokens resolved to a user with effective roles and permissions
//! - **RBAC engine**: role and permission management with a protected `admin` role
//! - **Access guard**: per-route role, permission and ownership requirements
//! - **Seeder**: idempotent bootstrap of the default roles, permissions and admin account
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use gatekeeper::Config;
//! use gatekeeper::server::builder::run_server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config/gatekeeper.yaml").await?;
//!     run_server(config).await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

pub use auth::{AccessRequirement, AuthSystem, Identity};
pub use config::Config;
pub use utils::error::{GatekeeperError, Result};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
