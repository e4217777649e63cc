use crate::core::models::{User, UserFilter, UserRoleBinding, UserStats, UserStatus};
use crate::utils::error::{GatekeeperError, Result};
use sea_orm::*;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, role, user, user_role};
use super::types::SeaOrmDatabase;

impl SeaOrmDatabase {
    /// Find user by ID
    pub async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        debug!("Finding user by ID: {}", user_id);

        let user_model = entities::User::find_by_id(user_id).one(&self.db).await?;
        Ok(user_model.map(|model| model.to_domain_user()))
    }

    /// Find user by email
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        debug!("Finding user by email: {}", email);

        let user_model = entities::User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(user_model.map(|model| model.to_domain_user()))
    }

    /// Find user by email or username
    pub async fn find_user_by_login(&self, identifier: &str) -> Result<Option<User>> {
        debug!("Finding user by login: {}", identifier);

        let user_model = entities::User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(identifier))
                    .add(user::Column::Username.eq(identifier)),
            )
            .one(&self.db)
            .await?;
        Ok(user_model.map(|model| model.to_domain_user()))
    }

    /// Insert a user with its initial role bindings
    pub async fn insert_user(&self, user: &User, role_ids: &[Uuid]) -> Result<User> {
        debug!("Creating user: {}", user.username);

        let txn = self.db.begin().await?;

        let taken = entities::User::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(user.email.as_str()))
                    .add(user::Column::Username.eq(user.username.as_str())),
            )
            .count(&txn)
            .await?;
        if taken > 0 {
            return Err(GatekeeperError::conflict(
                "User with this email or username already exists",
            ));
        }

        entities::User::insert(user::Model::from_domain_user(user))
            .exec(&txn)
            .await?;

        for role_id in role_ids {
            let binding = UserRoleBinding::new(user.id, *role_id);
            entities::UserRole::insert(user_role::Model::from_domain_binding(&binding))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(user.clone())
    }

    /// Write every user column
    pub async fn update_user(&self, user: &User) -> Result<User> {
        debug!("Updating user: {}", user.id);

        let model = user::Model::from_domain_user(user).update(&self.db).await?;
        Ok(model.to_domain_user())
    }

    /// Update user password
    pub async fn update_user_password(&self, user_id: Uuid, password_hash: &str) -> Result<()> {
        debug!("Updating password for user: {}", user_id);

        let mut user: user::ActiveModel = entities::User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| GatekeeperError::not_found("User not found"))?
            .into();

        user.password_hash = Set(password_hash.to_string());
        user.updated_at = Set(chrono::Utc::now().into());
        user.update(&self.db).await?;

        Ok(())
    }

    /// Update user last login
    pub async fn update_user_last_login(&self, user_id: Uuid) -> Result<()> {
        debug!("Updating last login for user: {}", user_id);

        let user_model = entities::User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| GatekeeperError::not_found("User not found"))?;

        let mut active_model: user::ActiveModel = user_model.into();
        active_model.last_login_at = Set(Some(chrono::Utc::now().into()));
        active_model.update(&self.db).await?;

        Ok(())
    }

    /// Delete a user and its bindings
    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        debug!("Deleting user: {}", user_id);

        let txn = self.db.begin().await?;
        entities::UserRole::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        let result = entities::User::delete_by_id(user_id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(GatekeeperError::not_found("User not found"));
        }
        txn.commit().await?;

        Ok(())
    }

    /// One page of users matching the filter, newest first, plus the total
    pub async fn list_users(&self, filter: &UserFilter) -> Result<(Vec<User>, u64)> {
        debug!("Listing users: {:?}", filter);

        let mut condition = Condition::all();

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            condition = condition.add(
                Condition::any()
                    .add(user::Column::Email.contains(search))
                    .add(user::Column::Username.contains(search))
                    .add(user::Column::FirstName.contains(search))
                    .add(user::Column::LastName.contains(search)),
            );
        }

        if let Some(status) = filter.status {
            condition = condition.add(user::Column::Status.eq(status.as_str()));
        }

        if let Some(role_name) = filter.role.as_deref() {
            let holders: Vec<Uuid> = entities::UserRole::find()
                .select_only()
                .column(user_role::Column::UserId)
                .join(JoinType::InnerJoin, user_role::Relation::Role.def())
                .filter(role::Column::Name.eq(role_name))
                .filter(user_role::Column::IsActive.eq(true))
                .into_tuple::<Uuid>()
                .all(&self.db)
                .await?;
            condition = condition.add(user::Column::Id.is_in(holders));
        }

        let page = filter.page.max(1);
        let limit = filter.limit.clamp(1, 100);

        let paginator = entities::User::find()
            .filter(condition)
            .order_by_desc(user::Column::CreatedAt)
            .paginate(&self.db, limit);
        let total = paginator.num_items().await?;
        let users = paginator
            .fetch_page(page - 1)
            .await?
            .iter()
            .map(|model| model.to_domain_user())
            .collect();

        Ok((users, total))
    }

    /// Account counters by status
    pub async fn user_stats(&self) -> Result<UserStats> {
        let count_status = |status: UserStatus| {
            entities::User::find()
                .filter(user::Column::Status.eq(status.as_str()))
                .count(&self.db)
        };

        Ok(UserStats {
            total: entities::User::find().count(&self.db).await?,
            active: count_status(UserStatus::Active).await?,
            inactive: count_status(UserStatus::Inactive).await?,
            banned: count_status(UserStatus::Banned).await?,
            suspended: count_status(UserStatus::Suspended).await?,
            verified: entities::User::find()
                .filter(user::Column::IsVerified.eq(true))
                .count(&self.db)
                .await?,
        })
    }
}
