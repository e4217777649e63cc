//! RBAC system core

use crate::core::models::{Permission, Role, RoleExpand};
use crate::storage::database::Database;
use crate::utils::error::{GatekeeperError, Result};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// RBAC engine backed by the entity store
#[derive(Debug, Clone)]
pub struct RbacSystem {
    pub(super) database: Arc<Database>,
}

impl RbacSystem {
    /// Create a new RBAC system
    pub fn new(database: Arc<Database>) -> Self {
        info!("Initializing RBAC system");
        Self { database }
    }

    /// Role with its permissions, or `NotFound`
    pub(super) async fn require_role(&self, role_id: Uuid, expand: RoleExpand) -> Result<Role> {
        self.database
            .find_role_by_id(role_id, expand)
            .await?
            .ok_or_else(|| GatekeeperError::not_found(format!("Role with ID {} not found", role_id)))
    }

    /// Role that may still be changed at runtime
    pub(super) async fn require_mutable_role(&self, role_id: Uuid) -> Result<Role> {
        let role = self.require_role(role_id, RoleExpand::Bare).await?;
        if role.is_immutable() {
            return Err(GatekeeperError::forbidden(
                "The protected admin role cannot be modified",
            ));
        }
        Ok(role)
    }

    pub(super) async fn require_permission(&self, permission_id: Uuid) -> Result<Permission> {
        self.database
            .find_permission_by_id(permission_id)
            .await?
            .ok_or_else(|| {
                GatekeeperError::not_found(format!("Permission with ID {} not found", permission_id))
            })
    }
}
