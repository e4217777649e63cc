//! Declarative seed dataset

use crate::core::models::{ADMIN_ROLE, permission_name};
use crate::utils::error::{GatekeeperError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Everything the seeder makes sure exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedDataset {
    pub version: u32,
    #[serde(default)]
    pub permissions: Vec<SeedPermission>,
    #[serde(default)]
    pub roles: Vec<SeedRole>,
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedPermission {
    pub resource: String,
    pub action: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl SeedPermission {
    pub fn name(&self) -> String {
        permission_name(&self.resource, &self.action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRole {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub protected: bool,
    #[serde(default)]
    pub grants: RoleGrant,
}

/// Which dataset permissions a role receives
///
/// `all` wins; otherwise named permissions are unioned with every permission
/// whose action is in `actions` (restricted to `resources` when non-empty).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleGrant {
    pub all: bool,
    pub permissions: Vec<String>,
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedUser {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl RoleGrant {
    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    pub fn named(permissions: &[&str]) -> Self {
        Self {
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Names of the dataset permissions this grant selects
    pub fn resolve(&self, permissions: &[SeedPermission]) -> BTreeSet<String> {
        if self.all {
            return permissions.iter().map(SeedPermission::name).collect();
        }

        let mut names: BTreeSet<String> = self.permissions.iter().cloned().collect();
        if !self.actions.is_empty() {
            names.extend(
                permissions
                    .iter()
                    .filter(|p| self.actions.contains(&p.action))
                    .filter(|p| self.resources.is_empty() || self.resources.contains(&p.resource))
                    .map(SeedPermission::name),
            );
        }
        names
    }
}

impl SeedDataset {
    /// Built-in dataset, version 1
    pub fn builtin() -> Self {
        const CRUD_RESOURCES: [&str; 5] = ["users", "roles", "permissions", "settings", "posts"];
        const CRUD_ACTIONS: [&str; 4] = ["create", "read", "update", "delete"];

        let mut permissions: Vec<SeedPermission> = CRUD_RESOURCES
            .iter()
            .flat_map(|resource| {
                CRUD_ACTIONS.iter().map(move |action| SeedPermission {
                    resource: resource.to_string(),
                    action: action.to_string(),
                    description: Some(format!("{} {}", capitalize(action), resource)),
                })
            })
            .collect();
        permissions.extend(
            [
                ("reports", "read", "Read reports"),
                ("analytics", "read", "Read analytics"),
                ("system", "backup", "Back up the system"),
                ("system", "restore", "Restore the system"),
                ("system", "maintenance", "Run system maintenance"),
            ]
            .into_iter()
            .map(|(resource, action, description)| SeedPermission {
                resource: resource.to_string(),
                action: action.to_string(),
                description: Some(description.to_string()),
            }),
        );

        let roles = vec![
            SeedRole {
                name: ADMIN_ROLE.to_string(),
                description: Some("Administrator with full system access".to_string()),
                protected: true,
                grants: RoleGrant::all(),
            },
            SeedRole {
                name: "manager".to_string(),
                description: Some("Manages users and content".to_string()),
                protected: false,
                grants: RoleGrant::named(&[
                    "users:read",
                    "users:update",
                    "posts:create",
                    "posts:read",
                    "posts:update",
                    "posts:delete",
                    "reports:read",
                ]),
            },
            SeedRole {
                name: "editor".to_string(),
                description: Some("Creates and edits content".to_string()),
                protected: false,
                grants: RoleGrant::named(&["posts:create", "posts:read", "posts:update", "users:read"]),
            },
            SeedRole {
                name: "user".to_string(),
                description: Some("Regular user".to_string()),
                protected: false,
                grants: RoleGrant::named(&["posts:read", "users:read"]),
            },
            SeedRole {
                name: "viewer".to_string(),
                description: Some("Read-only access".to_string()),
                protected: false,
                grants: RoleGrant {
                    actions: vec!["read".to_string()],
                    resources: vec!["posts".to_string(), "users".to_string()],
                    ..RoleGrant::default()
                },
            },
        ];

        let users = vec![SeedUser {
            email: "admin@example.com".to_string(),
            username: "admin".to_string(),
            password: "admin123".to_string(),
            first_name: Some("System".to_string()),
            last_name: Some("Administrator".to_string()),
            roles: vec![ADMIN_ROLE.to_string()],
        }];

        Self {
            version: 1,
            permissions,
            roles,
            users,
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let dataset: Self = serde_yaml::from_str(content)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_yaml_str(&content)
    }

    /// Reject datasets that reference things they do not define
    pub fn validate(&self) -> Result<()> {
        if self.version == 0 {
            return Err(GatekeeperError::validation("Seed dataset version must be at least 1"));
        }

        let mut known = BTreeSet::new();
        for permission in &self.permissions {
            if permission.resource.trim().is_empty()
                || permission.action.trim().is_empty()
                || permission.resource.contains(':')
                || permission.action.contains(':')
            {
                return Err(GatekeeperError::validation(format!(
                    "Invalid seed permission '{}'",
                    permission.name()
                )));
            }
            known.insert(permission.name());
        }

        let mut roles = BTreeSet::new();
        for role in &self.roles {
            if !roles.insert(role.name.as_str()) {
                return Err(GatekeeperError::validation(format!(
                    "Seed role '{}' is defined twice",
                    role.name
                )));
            }
            if let Some(unknown) = role.grants.permissions.iter().find(|p| !known.contains(*p)) {
                return Err(GatekeeperError::validation(format!(
                    "Seed role '{}' grants undefined permission '{}'",
                    role.name, unknown
                )));
            }
        }

        for user in &self.users {
            if let Some(unknown) = user.roles.iter().find(|r| !roles.contains(r.as_str())) {
                return Err(GatekeeperError::validation(format!(
                    "Seed user '{}' references undefined role '{}'",
                    user.username, unknown
                )));
            }
        }

        Ok(())
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
