use crate::core::models::{Role, RoleExpand};
use crate::utils::error::{GatekeeperError, Result};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, role, role_permission, user_role};
use super::relations::{existing_permission_ids, expand_roles, link_permissions};
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Find role by ID
    pub async fn find_role_by_id(&self, role_id: Uuid, expand: RoleExpand) -> Result<Option<Role>> {
        debug!("Finding role by ID: {}", role_id);

        let txn = self.db.begin().await?;
        let model = entities::Role::find_by_id(role_id).one(&txn).await?;
        let role = Self::expand_one(&txn, model, expand).await?;
        txn.commit().await?;

        Ok(role)
    }

    /// Find role by unique name
    pub async fn find_role_by_name(&self, name: &str, expand: RoleExpand) -> Result<Option<Role>> {
        debug!("Finding role by name: {}", name);

        let txn = self.db.begin().await?;
        let model = entities::Role::find()
            .filter(role::Column::Name.eq(name))
            .one(&txn)
            .await?;
        let role = Self::expand_one(&txn, model, expand).await?;
        txn.commit().await?;

        Ok(role)
    }

    /// All roles, newest first
    pub async fn list_roles(&self, expand: RoleExpand) -> Result<Vec<Role>> {
        debug!("Listing roles");

        let txn = self.db.begin().await?;
        let models = entities::Role::find()
            .order_by_desc(role::Column::CreatedAt)
            .all(&txn)
            .await?;
        let roles = expand_roles(&txn, models, expand).await?;
        txn.commit().await?;

        Ok(roles)
    }

    /// Insert a role and link the given permissions
    ///
    /// Permission ids that do not exist are skipped. The returned role has its
    /// permissions expanded.
    pub async fn insert_role(&self, role: &Role, permission_ids: &[Uuid]) -> Result<Role> {
        debug!("Creating role: {}", role.name);

        let txn = self.db.begin().await?;

        Self::ensure_role_name_free(&txn, &role.name, None).await?;
        entities::Role::insert(role::Model::from_domain_role(role))
            .exec(&txn)
            .await?;

        let permission_ids = existing_permission_ids(&txn, permission_ids).await?;
        link_permissions(&txn, role.id, &permission_ids).await?;

        let created = Self::reload(&txn, role.id).await?;
        txn.commit().await?;

        Ok(created)
    }

    /// Write role columns and, when given, replace its permission set
    pub async fn update_role(&self, role: &Role, permission_ids: Option<&[Uuid]>) -> Result<Role> {
        debug!("Updating role: {}", role.id);

        let txn = self.db.begin().await?;

        Self::ensure_role_name_free(&txn, &role.name, Some(role.id)).await?;
        role::Model::from_domain_role(role).update(&txn).await?;

        if let Some(permission_ids) = permission_ids {
            entities::RolePermission::delete_many()
                .filter(role_permission::Column::RoleId.eq(role.id))
                .exec(&txn)
                .await?;
            let permission_ids = existing_permission_ids(&txn, permission_ids).await?;
            link_permissions(&txn, role.id, &permission_ids).await?;
        }

        let updated = Self::reload(&txn, role.id).await?;
        txn.commit().await?;

        Ok(updated)
    }

    /// Delete a role that no binding references
    pub async fn delete_role(&self, role_id: Uuid) -> Result<()> {
        debug!("Deleting role: {}", role_id);

        let txn = self.db.begin().await?;

        let bindings = Self::count_role_bindings(&txn, role_id).await?;
        if bindings > 0 {
            return Err(GatekeeperError::conflict(format!(
                "Role is assigned to {} user(s) and cannot be deleted",
                bindings
            )));
        }

        entities::RolePermission::delete_many()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .exec(&txn)
            .await?;
        let result = entities::Role::delete_by_id(role_id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(GatekeeperError::not_found("Role not found"));
        }

        txn.commit().await?;
        Ok(())
    }

    /// Link permissions not already granted; unknown ids are skipped
    pub async fn add_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> Result<Role> {
        debug!("Adding {} permission(s) to role {}", permission_ids.len(), role_id);

        let txn = self.db.begin().await?;

        let granted: Vec<Uuid> = entities::RolePermission::find()
            .filter(role_permission::Column::RoleId.eq(role_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|link| link.permission_id)
            .collect();

        let to_link: Vec<Uuid> = existing_permission_ids(&txn, permission_ids)
            .await?
            .into_iter()
            .filter(|id| !granted.contains(id))
            .collect();
        link_permissions(&txn, role_id, &to_link).await?;
        Self::touch_role(&txn, role_id).await?;

        let updated = Self::reload(&txn, role_id).await?;
        txn.commit().await?;

        Ok(updated)
    }

    /// Unlink the given permissions from a role
    pub async fn remove_role_permissions(&self, role_id: Uuid, permission_ids: &[Uuid]) -> Result<Role> {
        debug!("Removing {} permission(s) from role {}", permission_ids.len(), role_id);

        let txn = self.db.begin().await?;

        if !permission_ids.is_empty() {
            entities::RolePermission::delete_many()
                .filter(role_permission::Column::RoleId.eq(role_id))
                .filter(role_permission::Column::PermissionId.is_in(permission_ids.iter().copied()))
                .exec(&txn)
                .await?;
        }
        Self::touch_role(&txn, role_id).await?;

        let updated = Self::reload(&txn, role_id).await?;
        txn.commit().await?;

        Ok(updated)
    }

    /// Number of bindings, active or not, referencing a role
    async fn count_role_bindings<C: ConnectionTrait>(conn: &C, role_id: Uuid) -> Result<u64> {
        let count = entities::UserRole::find()
            .filter(user_role::Column::RoleId.eq(role_id))
            .count(conn)
            .await?;
        Ok(count)
    }

    async fn expand_one<C: ConnectionTrait>(
        conn: &C,
        model: Option<role::Model>,
        expand: RoleExpand,
    ) -> Result<Option<Role>> {
        match model {
            Some(model) => Ok(expand_roles(conn, vec![model], expand).await?.pop()),
            None => Ok(None),
        }
    }

    async fn reload<C: ConnectionTrait>(conn: &C, role_id: Uuid) -> Result<Role> {
        let model = entities::Role::find_by_id(role_id).one(conn).await?;
        Self::expand_one(conn, model, RoleExpand::Permissions)
            .await?
            .ok_or_else(|| GatekeeperError::not_found("Role not found"))
    }

    async fn ensure_role_name_free<C: ConnectionTrait>(
        conn: &C,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<()> {
        let mut query = entities::Role::find().filter(role::Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(role::Column::Id.ne(id));
        }

        if query.count(conn).await? > 0 {
            return Err(GatekeeperError::conflict(format!(
                "Role with name '{}' already exists",
                name
            )));
        }
        Ok(())
    }

    async fn touch_role<C: ConnectionTrait>(conn: &C, role_id: Uuid) -> Result<()> {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        entities::Role::update_many()
            .col_expr(role::Column::UpdatedAt, Expr::value(now))
            .filter(role::Column::Id.eq(role_id))
            .exec(conn)
            .await?;
        Ok(())
    }
}
