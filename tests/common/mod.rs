//! Common test utilities for gatekeeper
//!
//! - In-memory SQLite database support
//! - Fixtures for accounts, roles and application state

pub mod database;
pub mod fixtures;

pub use database::TestDatabase;
pub use fixtures::{TestApp, UserFactory};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err and return the error
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
