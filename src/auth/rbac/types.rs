//! RBAC request types

use crate::core::models::permission_name;
use crate::utils::error::{GatekeeperError, Result};
use serde::Deserialize;
use uuid::Uuid;

/// Input for creating a role
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRole {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permission_ids: Option<Vec<Uuid>>,
}

impl NewRole {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_permissions(mut self, permission_ids: Vec<Uuid>) -> Self {
        self.permission_ids = Some(permission_ids);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_role_name(&self.name)
    }
}

/// Partial update of a role; absent fields are left as they are
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Replaces the whole permission set when present
    #[serde(default)]
    pub permission_ids: Option<Vec<Uuid>>,
}

impl RolePatch {
    pub fn validate(&self) -> Result<()> {
        match &self.name {
            Some(name) => validate_role_name(name),
            None => Ok(()),
        }
    }
}

/// Input for creating a permission
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPermission {
    pub resource: String,
    pub action: String,
    /// Optional; must equal `resource:action` when given
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewPermission {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The canonical name, checked against any supplied one
    pub fn resolved_name(&self) -> Result<String> {
        validate_segment("resource", &self.resource)?;
        validate_segment("action", &self.action)?;
        checked_name(&self.resource, &self.action, self.name.as_deref())
    }
}

/// Partial update of a permission
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionPatch {
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn validate_role_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(GatekeeperError::validation("Role name cannot be empty"));
    }
    if trimmed.len() > 50 {
        return Err(GatekeeperError::validation(
            "Role name must be at most 50 characters",
        ));
    }
    Ok(())
}

pub(super) fn validate_segment(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GatekeeperError::validation(format!(
            "Permission {} cannot be empty",
            field
        )));
    }
    if value.contains(':') {
        return Err(GatekeeperError::validation(format!(
            "Permission {} must not contain ':'",
            field
        )));
    }
    Ok(())
}

pub(super) fn checked_name(resource: &str, action: &str, supplied: Option<&str>) -> Result<String> {
    let name = permission_name(resource, action);
    match supplied {
        Some(supplied) if supplied != name => Err(GatekeeperError::validation(format!(
            "Permission name '{}' does not match '{}'",
            supplied, name
        ))),
        _ => Ok(name),
    }
}
