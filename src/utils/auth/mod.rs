//! Authentication and security utilities

pub mod password;

pub use password::{generate_secret, hash_password, verify_password};
