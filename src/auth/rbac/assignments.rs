//! User role bindings and the access predicates

use crate::core::models::{BindingExpand, BindingFilter, RoleExpand, UserRoleBinding, permission_name};
use crate::utils::error::{GatekeeperError, Result};
use tracing::{debug, info};
use uuid::Uuid;

use super::helpers::{effective_permissions, effective_roles};
use super::system::RbacSystem;

impl RbacSystem {
    /// Bind a user to a role
    pub async fn assign_role_to_user(&self, user_id: Uuid, role_id: Uuid) -> Result<UserRoleBinding> {
        if self.database.find_user_by_id(user_id).await?.is_none() {
            return Err(GatekeeperError::not_found(format!(
                "User with ID {} not found",
                user_id
            )));
        }
        let role = self.require_role(role_id, RoleExpand::Bare).await?;

        let binding = self
            .database
            .insert_binding(&UserRoleBinding::new(user_id, role.id))
            .await?;

        info!("Assigned role {} to user {}", role.name, user_id);
        Ok(binding)
    }

    /// Hard-delete a binding
    pub async fn remove_role_from_user(&self, user_id: Uuid, role_id: Uuid) -> Result<()> {
        if !self.database.delete_binding(user_id, role_id).await? {
            return Err(GatekeeperError::not_found("User role assignment not found"));
        }

        info!("Removed role {} from user {}", role_id, user_id);
        Ok(())
    }

    /// Soft-toggle a binding without deleting it
    pub async fn set_user_role_active(
        &self,
        user_id: Uuid,
        role_id: Uuid,
        is_active: bool,
    ) -> Result<UserRoleBinding> {
        let binding = self
            .database
            .set_binding_active(user_id, role_id, is_active)
            .await?
            .ok_or_else(|| GatekeeperError::not_found("User role assignment not found"))?;

        info!(
            "Binding of role {} to user {} is now {}",
            role_id,
            user_id,
            if is_active { "active" } else { "inactive" }
        );
        Ok(binding)
    }

    /// Active bindings of a user with their roles
    pub async fn get_user_roles(&self, user_id: Uuid) -> Result<Vec<UserRoleBinding>> {
        self.database
            .find_user_bindings(user_id, BindingFilter::ActiveOnly, BindingExpand::Role)
            .await
    }

    /// Sorted, deduplicated `resource:action` keys granted to a user
    pub async fn get_user_permissions(&self, user_id: Uuid) -> Result<Vec<String>> {
        let bindings = self
            .database
            .find_user_bindings(
                user_id,
                BindingFilter::ActiveOnly,
                BindingExpand::RoleAndPermissions,
            )
            .await?;

        Ok(effective_permissions(&bindings).into_iter().collect())
    }

    /// Exact `resource:action` membership in the user's effective set
    pub async fn has_permission(&self, user_id: Uuid, resource: &str, action: &str) -> Result<bool> {
        let key = permission_name(resource, action);
        let granted = self.get_user_permissions(user_id).await?.contains(&key);

        debug!("User {} has permission {}: {}", user_id, key, granted);
        Ok(granted)
    }

    /// Exact role name match over active bindings
    pub async fn has_role(&self, user_id: Uuid, role_name: &str) -> Result<bool> {
        let bindings = self.get_user_roles(user_id).await?;
        let granted = effective_roles(&bindings).contains(role_name);

        debug!("User {} has role {}: {}", user_id, role_name, granted);
        Ok(granted)
    }
}
