use crate::core::models::{BindingExpand, BindingFilter, UserAccess, UserRoleBinding};
use crate::utils::error::{GatekeeperError, Result};
use sea_orm::*;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, user_role};
use super::relations::expand_bindings;
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Find the binding for an exact (user, role) pair
    pub async fn find_binding(&self, user_id: Uuid, role_id: Uuid) -> Result<Option<UserRoleBinding>> {
        debug!("Finding binding user={} role={}", user_id, role_id);

        let model = Self::binding_query(user_id, role_id).one(&self.db).await?;
        Ok(model.map(|m| m.to_domain_binding(None)))
    }

    /// Insert a binding; an existing pair, active or not, is a conflict
    pub async fn insert_binding(&self, binding: &UserRoleBinding) -> Result<UserRoleBinding> {
        debug!("Binding user {} to role {}", binding.user_id, binding.role_id);

        let txn = self.db.begin().await?;
        let existing = Self::binding_query(binding.user_id, binding.role_id)
            .count(&txn)
            .await?;
        if existing > 0 {
            return Err(GatekeeperError::conflict("User already has this role"));
        }

        entities::UserRole::insert(user_role::Model::from_domain_binding(binding))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        Ok(binding.clone())
    }

    /// Hard-delete a binding; returns whether a row was removed
    pub async fn delete_binding(&self, user_id: Uuid, role_id: Uuid) -> Result<bool> {
        debug!("Removing binding user={} role={}", user_id, role_id);

        let result = entities::UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleId.eq(role_id))
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    /// Flip the soft toggle on a binding
    pub async fn set_binding_active(
        &self,
        user_id: Uuid,
        role_id: Uuid,
        is_active: bool,
    ) -> Result<Option<UserRoleBinding>> {
        debug!(
            "Setting binding user={} role={} active={}",
            user_id, role_id, is_active
        );

        let txn = self.db.begin().await?;
        let Some(model) = Self::binding_query(user_id, role_id).one(&txn).await? else {
            return Ok(None);
        };

        let mut active: user_role::ActiveModel = model.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(&txn).await?;
        txn.commit().await?;

        Ok(Some(updated.to_domain_binding(None)))
    }

    /// Bindings held by a user
    pub async fn find_user_bindings(
        &self,
        user_id: Uuid,
        filter: BindingFilter,
        expand: BindingExpand,
    ) -> Result<Vec<UserRoleBinding>> {
        debug!("Finding bindings for user: {} ({:?}, {:?})", user_id, filter, expand);

        let txn = self.db.begin().await?;
        let bindings = Self::user_bindings(&txn, user_id, filter, expand).await?;
        txn.commit().await?;

        Ok(bindings)
    }

    /// A user with its bindings, roles and permissions in one snapshot
    pub async fn load_user_access(
        &self,
        user_id: Uuid,
        filter: BindingFilter,
    ) -> Result<Option<UserAccess>> {
        debug!("Loading access graph for user: {}", user_id);

        let txn = self.db.begin().await?;
        let Some(user) = entities::User::find_by_id(user_id).one(&txn).await? else {
            return Ok(None);
        };
        let bindings =
            Self::user_bindings(&txn, user_id, filter, BindingExpand::RoleAndPermissions).await?;
        txn.commit().await?;

        Ok(Some(UserAccess {
            user: user.to_domain_user(),
            bindings,
        }))
    }

    pub(super) async fn user_bindings<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        filter: BindingFilter,
        expand: BindingExpand,
    ) -> Result<Vec<UserRoleBinding>> {
        let mut query = entities::UserRole::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(user_role::Column::CreatedAt);
        if filter == BindingFilter::ActiveOnly {
            query = query.filter(user_role::Column::IsActive.eq(true));
        }

        let models = query.all(conn).await?;
        expand_bindings(conn, models, expand).await
    }

    fn binding_query(user_id: Uuid, role_id: Uuid) -> Select<entities::UserRole> {
        entities::UserRole::find()
            .filter(user_role::Column::UserId.eq(user_id))
            .filter(user_role::Column::RoleId.eq(role_id))
    }
}
