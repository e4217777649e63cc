//! Role management methods

use crate::core::models::{Role, RoleExpand};
use crate::utils::error::{GatekeeperError, Result};
use tracing::info;
use uuid::Uuid;

use super::system::RbacSystem;
use super::types::{NewRole, RolePatch};

impl RbacSystem {
    /// Create a role, attaching whichever of the given permissions exist
    pub async fn create_role(&self, request: NewRole) -> Result<Role> {
        request.validate()?;

        let role = Role::new(request.name.trim(), request.description);
        let permission_ids = request.permission_ids.unwrap_or_default();
        let created = self.database.insert_role(&role, &permission_ids).await?;

        info!(
            "Created role {} with {} permission(s)",
            created.name,
            created.permissions().len()
        );
        Ok(created)
    }

    /// Merge a patch into a role
    pub async fn update_role(&self, role_id: Uuid, patch: RolePatch) -> Result<Role> {
        patch.validate()?;

        let mut role = self.require_mutable_role(role_id).await?;
        if let Some(name) = patch.name {
            role.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            role.description = Some(description);
        }
        role.updated_at = chrono::Utc::now();

        let updated = self
            .database
            .update_role(&role, patch.permission_ids.as_deref())
            .await?;

        info!("Updated role {}", updated.name);
        Ok(updated)
    }

    /// Delete a role no user is bound to
    pub async fn delete_role(&self, role_id: Uuid) -> Result<()> {
        let role = self.require_mutable_role(role_id).await?;
        self.database.delete_role(role_id).await?;

        info!("Deleted role {}", role.name);
        Ok(())
    }

    /// Grant permissions to a role; already granted and unknown ids are skipped
    pub async fn add_permissions_to_role(&self, role_id: Uuid, permission_ids: &[Uuid]) -> Result<Role> {
        let role = self.require_mutable_role(role_id).await?;
        let updated = self
            .database
            .add_role_permissions(role.id, permission_ids)
            .await?;

        info!(
            "Role {} now grants {} permission(s)",
            updated.name,
            updated.permissions().len()
        );
        Ok(updated)
    }

    /// Revoke permissions from a role
    pub async fn remove_permissions_from_role(
        &self,
        role_id: Uuid,
        permission_ids: &[Uuid],
    ) -> Result<Role> {
        let role = self.require_mutable_role(role_id).await?;
        let updated = self
            .database
            .remove_role_permissions(role.id, permission_ids)
            .await?;

        info!(
            "Role {} now grants {} permission(s)",
            updated.name,
            updated.permissions().len()
        );
        Ok(updated)
    }

    /// All roles with their permissions, newest first
    pub async fn get_all_roles(&self) -> Result<Vec<Role>> {
        self.database.list_roles(RoleExpand::Permissions).await
    }

    pub async fn get_role_by_id(&self, role_id: Uuid) -> Result<Role> {
        self.require_role(role_id, RoleExpand::Permissions).await
    }

    pub async fn get_role_by_name(&self, name: &str) -> Result<Role> {
        self.database
            .find_role_by_name(name, RoleExpand::Permissions)
            .await?
            .ok_or_else(|| GatekeeperError::not_found(format!("Role '{}' not found", name)))
    }
}
