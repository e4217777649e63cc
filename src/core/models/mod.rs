//! Domain models shared by storage, authorization and the HTTP layer

pub mod rbac;
pub mod user;

pub use rbac::{
    ADMIN_ROLE, BindingExpand, BindingFilter, Permission, Role, RoleExpand, UserRoleBinding,
    permission_name,
};
pub use user::{User, UserAccess, UserFilter, UserStats, UserStatus};
