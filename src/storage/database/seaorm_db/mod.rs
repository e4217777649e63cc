// Module declarations
mod binding_ops;
mod connection;
mod permission_ops;
mod relations;
mod role_ops;
mod types;
mod user_ops;


// Re-export public types
pub use types::{DatabaseBackendType, SeaOrmDatabase};
