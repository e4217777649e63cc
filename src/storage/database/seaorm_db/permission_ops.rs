use crate::core::models::Permission;
use crate::utils::error::{GatekeeperError, Result};
use sea_orm::*;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, permission, role_permission};
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Find permission by ID
    pub async fn find_permission_by_id(&self, permission_id: Uuid) -> Result<Option<Permission>> {
        debug!("Finding permission by ID: {}", permission_id);

        let model = entities::Permission::find_by_id(permission_id)
            .one(&self.db)
            .await?;

        Ok(model.map(|m| m.to_domain_permission()))
    }

    /// Find permission by its `resource:action` name
    pub async fn find_permission_by_name(&self, name: &str) -> Result<Option<Permission>> {
        debug!("Finding permission by name: {}", name);

        let model = entities::Permission::find()
            .filter(permission::Column::Name.eq(name))
            .one(&self.db)
            .await?;

        Ok(model.map(|m| m.to_domain_permission()))
    }

    /// All permissions ordered by resource, then action
    pub async fn list_permissions(&self) -> Result<Vec<Permission>> {
        debug!("Listing permissions");

        let models = entities::Permission::find()
            .order_by_asc(permission::Column::Resource)
            .order_by_asc(permission::Column::Action)
            .all(&self.db)
            .await?;

        Ok(models.iter().map(|m| m.to_domain_permission()).collect())
    }

    /// Insert a permission; a taken name is a conflict
    pub async fn insert_permission(&self, permission: &Permission) -> Result<Permission> {
        debug!("Creating permission: {}", permission.name);

        let txn = self.db.begin().await?;
        Self::ensure_permission_name_free(&txn, &permission.name, None).await?;
        entities::Permission::insert(permission::Model::from_domain_permission(permission))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        Ok(permission.clone())
    }

    /// Write every permission column
    pub async fn update_permission(&self, permission: &Permission) -> Result<Permission> {
        debug!("Updating permission: {}", permission.id);

        let txn = self.db.begin().await?;
        Self::ensure_permission_name_free(&txn, &permission.name, Some(permission.id)).await?;
        let model = permission::Model::from_domain_permission(permission)
            .update(&txn)
            .await?;
        txn.commit().await?;

        Ok(model.to_domain_permission())
    }

    /// Delete a permission and its grants
    pub async fn delete_permission(&self, permission_id: Uuid) -> Result<()> {
        debug!("Deleting permission: {}", permission_id);

        let txn = self.db.begin().await?;
        entities::RolePermission::delete_many()
            .filter(role_permission::Column::PermissionId.eq(permission_id))
            .exec(&txn)
            .await?;
        let result = entities::Permission::delete_by_id(permission_id)
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(GatekeeperError::not_found("Permission not found"));
        }
        txn.commit().await?;

        Ok(())
    }

    async fn ensure_permission_name_free<C: ConnectionTrait>(
        conn: &C,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<()> {
        let mut query = entities::Permission::find().filter(permission::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(permission::Column::Id.ne(id));
        }

        if query.count(conn).await? > 0 {
            return Err(GatekeeperError::conflict(format!(
                "Permission '{}' already exists",
                name
            )));
        }
        Ok(())
    }
}
