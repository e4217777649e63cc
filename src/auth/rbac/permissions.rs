//! Permission management methods

use crate::core::models::Permission;
use crate::utils::error::Result;
use tracing::info;
use uuid::Uuid;

use super::system::RbacSystem;
use super::types::{NewPermission, PermissionPatch, checked_name, validate_segment};

impl RbacSystem {
    /// Create a permission named after its `resource:action` pair
    pub async fn create_permission(&self, request: NewPermission) -> Result<Permission> {
        let name = request.resolved_name()?;

        let mut permission = Permission::new(request.resource, request.action, request.description);
        permission.name = name;
        let created = self.database.insert_permission(&permission).await?;

        info!("Created permission {}", created.name);
        Ok(created)
    }

    /// Merge a patch; the name always follows the resulting pair
    pub async fn update_permission(
        &self,
        permission_id: Uuid,
        patch: PermissionPatch,
    ) -> Result<Permission> {
        let mut permission = self.require_permission(permission_id).await?;

        if let Some(resource) = patch.resource {
            validate_segment("resource", &resource)?;
            permission.resource = resource;
        }
        if let Some(action) = patch.action {
            validate_segment("action", &action)?;
            permission.action = action;
        }
        if let Some(description) = patch.description {
            permission.description = Some(description);
        }
        permission.name = checked_name(
            &permission.resource,
            &permission.action,
            patch.name.as_deref(),
        )?;
        permission.updated_at = chrono::Utc::now();

        let updated = self.database.update_permission(&permission).await?;

        info!("Updated permission {}", updated.name);
        Ok(updated)
    }

    /// Delete a permission and its role links
    pub async fn delete_permission(&self, permission_id: Uuid) -> Result<()> {
        self.database.delete_permission(permission_id).await?;

        info!("Deleted permission {}", permission_id);
        Ok(())
    }

    /// All permissions ordered by resource, then action
    pub async fn get_all_permissions(&self) -> Result<Vec<Permission>> {
        self.database.list_permissions().await
    }

    pub async fn get_permission_by_id(&self, permission_id: Uuid) -> Result<Permission> {
        self.require_permission(permission_id).await
    }
}
