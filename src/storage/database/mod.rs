//! Database storage implementation using SeaORM
//!
//! Reads take an explicit expansion argument (`RoleExpand`, `BindingExpand`)
//! naming the relations to load. Multi-row reads and all multi-step writes run
//! inside one transaction.

/// Database entities module
pub mod entities;
/// Database migration module
pub mod migration;
/// SeaORM database implementation module
pub mod seaorm_db;

// Re-export the main database interface
pub use seaorm_db::DatabaseBackendType;
pub use seaorm_db::SeaOrmDatabase as Database;
