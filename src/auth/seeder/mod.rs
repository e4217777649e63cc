//! Idempotent bootstrap of permissions, roles and default accounts

pub mod dataset;
mod runner;


pub use dataset::{RoleGrant, SeedDataset, SeedPermission, SeedRole, SeedUser};
pub use runner::{SeedReport, Seeder};
