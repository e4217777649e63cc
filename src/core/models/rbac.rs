//! Roles, permissions and user role bindings

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the built-in role that cannot be modified at runtime
pub const ADMIN_ROLE: &str = "admin";

/// Canonical `resource:action` name of a permission
pub fn permission_name(resource: &str, action: &str) -> String {
    format!("{}:{}", resource, action)
}

/// Atomic capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: Uuid,
    /// Always `resource:action`
    pub name: String,
    pub description: Option<String>,
    pub resource: String,
    pub action: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    pub fn new(resource: impl Into<String>, action: impl Into<String>, description: Option<String>) -> Self {
        let resource = resource.into();
        let action = action.into();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: permission_name(&resource, &action),
            description,
            resource,
            action,
            created_at: now,
            updated_at: now,
        }
    }

    /// The key access checks compare against
    pub fn key(&self) -> String {
        permission_name(&self.resource, &self.action)
    }
}

/// Named bundle of permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_protected: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// `None` unless the read asked for [`RoleExpand::Permissions`]
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub permissions: Option<Vec<Permission>>,
}

impl Role {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            is_protected: false,
            created_at: now,
            updated_at: now,
            permissions: None,
        }
    }

    /// Protected admin role: no update, delete or permission changes
    pub fn is_immutable(&self) -> bool {
        self.is_protected && self.name == ADMIN_ROLE
    }

    /// Loaded permissions, empty when the relation was not expanded
    pub fn permissions(&self) -> &[Permission] {
        self.permissions.as_deref().unwrap_or_default()
    }
}

/// Binding of one user to one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRoleBinding {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role_id: Uuid,
    /// Inactive bindings are kept but grant nothing
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// `None` unless the read expanded the role
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role: Option<Role>,
}

impl UserRoleBinding {
    pub fn new(user_id: Uuid, role_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            role_id,
            is_active: true,
            created_at: now,
            updated_at: now,
            role: None,
        }
    }
}

/// Relations loaded with a role read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleExpand {
    Bare,
    Permissions,
}

/// Relations loaded with a binding read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingExpand {
    Bare,
    Role,
    RoleAndPermissions,
}

/// Which bindings a read returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingFilter {
    All,
    ActiveOnly,
}
