//! Role-Based Access Control (RBAC) engine
//!
//! Role and permission lifecycle, user bindings, and the `has_role` /
//! `has_permission` predicates every guarded route is evaluated with.

mod assignments;
pub mod helpers;
mod permissions;
mod roles;
mod system;
pub mod types;


pub use helpers::{effective_permissions, effective_roles};
pub use system::RbacSystem;
pub use types::{NewPermission, NewRole, PermissionPatch, RolePatch};
