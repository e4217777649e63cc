//! Authentication and authorization
//!
//! Token issuing and verification, identity resolution, the RBAC engine, the
//! access guard and the seeder, tied together by [`AuthSystem`].

pub mod guard;
pub mod identity;
pub mod jwt;
mod login;
pub mod rbac;
pub mod seeder;
mod system;
mod user_management;


pub use guard::{AccessEvaluator, AccessGuard, AccessRequirement};
pub use identity::{Identity, IdentityResolver};
pub use login::LoginResponse;
pub use system::AuthSystem;
pub use user_management::{NewUser, PasswordChange, StatusChange};
