/// Permission entity module
pub mod permission;
/// Role entity module
pub mod role;
/// Role to permission join entity module
pub mod role_permission;
/// User entity module
pub mod user;
/// User to role binding entity module
pub mod user_role;

pub use permission::Entity as Permission;
pub use role::Entity as Role;
pub use role_permission::Entity as RolePermission;
pub use user::Entity as User;
pub use user_role::Entity as UserRole;
