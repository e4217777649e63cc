//! Integration tests for gatekeeper
//!
//! These tests run the real components against an in-memory SQLite store.

pub mod guard_tests;
pub mod http_tests;
pub mod identity_tests;
pub mod rbac_tests;
pub mod seeder_tests;
