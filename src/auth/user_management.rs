//! User management operations

use super::identity::Identity;
use super::system::AuthSystem;
use crate::core::models::{ADMIN_ROLE, RoleExpand, User, UserFilter, UserStats, UserStatus};
use crate::utils::auth::{hash_password, verify_password};
use crate::utils::error::{GatekeeperError, Result};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

const DEFAULT_ROLE: &str = "user";
const DEFAULT_BAN_REASON: &str = "No reason provided";
const MIN_PASSWORD_LENGTH: usize = 8;

/// Account creation request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Role names; defaults to `user`
    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err(GatekeeperError::validation("Invalid email address")),
        }
        let username = self.username.trim();
        if username.len() < 3 || username.len() > 50 {
            return Err(GatekeeperError::validation(
                "Username must be between 3 and 50 characters",
            ));
        }
        if username.contains('@') {
            return Err(GatekeeperError::validation("Username must not contain '@'"));
        }
        validate_password(&self.password)
    }
}

/// Status change request
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChange {
    pub status: UserStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Password change request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    /// Required unless an admin changes someone else's password
    #[serde(default)]
    pub current_password: Option<String>,
    pub new_password: String,
}

fn validate_password(password: &str) -> Result<()> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(GatekeeperError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

impl AuthSystem {
    /// Create an account with its initial roles
    pub async fn create_user(&self, request: NewUser) -> Result<User> {
        request.validate()?;
        info!("Creating new user: {}", request.username);

        let role_names = request
            .roles
            .unwrap_or_else(|| vec![DEFAULT_ROLE.to_string()]);
        let mut role_ids = Vec::with_capacity(role_names.len());
        for name in &role_names {
            let role = self
                .storage
                .db()
                .find_role_by_name(name, RoleExpand::Bare)
                .await?
                .ok_or_else(|| GatekeeperError::not_found(format!("Role '{}' not found", name)))?;
            role_ids.push(role.id);
        }

        let mut user = User::new(
            request.email.trim(),
            request.username.trim(),
            hash_password(&request.password)?,
        );
        user.first_name = request.first_name;
        user.last_name = request.last_name;

        self.storage.db().insert_user(&user, &role_ids).await
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        self.storage
            .db()
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| GatekeeperError::not_found(format!("User with ID {} not found", user_id)))
    }

    /// One page of users and the total matching the filter
    pub async fn list_users(&self, filter: &UserFilter) -> Result<(Vec<User>, u64)> {
        self.storage.db().list_users(filter).await
    }

    pub async fn user_stats(&self) -> Result<UserStats> {
        self.storage.db().user_stats().await
    }

    /// Move an account to a new status, keeping the ban audit fields in step
    pub async fn update_user_status(
        &self,
        user_id: Uuid,
        change: StatusChange,
        actor: Option<Uuid>,
    ) -> Result<User> {
        let mut user = self.get_user(user_id).await?;

        if change.status != UserStatus::Active && self.rbac.has_role(user_id, ADMIN_ROLE).await? {
            warn!("Refused to set admin {} to {}", user.username, change.status);
            return Err(GatekeeperError::forbidden(
                "Administrators cannot be disabled or banned",
            ));
        }

        if change.status == UserStatus::Banned {
            user.banned_at = Some(chrono::Utc::now());
            user.banned_reason = Some(
                change
                    .reason
                    .filter(|reason| !reason.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_BAN_REASON.to_string()),
            );
            user.banned_by = actor;
        } else if user.is_banned() {
            user.banned_at = None;
            user.banned_reason = None;
            user.banned_by = None;
        }
        user.status = change.status;
        user.updated_at = chrono::Utc::now();

        let updated = self.storage.db().update_user(&user).await?;
        info!("User {} is now {}", updated.username, updated.status);
        Ok(updated)
    }

    pub async fn disable_user(&self, user_id: Uuid, actor: Option<Uuid>) -> Result<User> {
        self.update_user_status(
            user_id,
            StatusChange {
                status: UserStatus::Inactive,
                reason: None,
            },
            actor,
        )
        .await
    }

    pub async fn enable_user(&self, user_id: Uuid, actor: Option<Uuid>) -> Result<User> {
        self.update_user_status(
            user_id,
            StatusChange {
                status: UserStatus::Active,
                reason: None,
            },
            actor,
        )
        .await
    }

    pub async fn ban_user(
        &self,
        user_id: Uuid,
        reason: Option<String>,
        actor: Option<Uuid>,
    ) -> Result<User> {
        self.update_user_status(
            user_id,
            StatusChange {
                status: UserStatus::Banned,
                reason,
            },
            actor,
        )
        .await
    }

    pub async fn unban_user(&self, user_id: Uuid, actor: Option<Uuid>) -> Result<User> {
        self.enable_user(user_id, actor).await
    }

    /// Delete an account and its bindings
    pub async fn delete_user(&self, user_id: Uuid) -> Result<()> {
        let user = self.get_user(user_id).await?;
        if self.rbac.has_role(user_id, ADMIN_ROLE).await? {
            return Err(GatekeeperError::forbidden("Administrators cannot be deleted"));
        }

        self.storage.db().delete_user(user_id).await?;
        info!("Deleted user {}", user.username);
        Ok(())
    }

    /// Replace a password
    ///
    /// Owners must prove the current password; admins acting on another
    /// account may skip it.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        actor: &Identity,
        change: PasswordChange,
    ) -> Result<()> {
        validate_password(&change.new_password)?;
        let user = self.get_user(user_id).await?;

        let acting_for_other = actor.id != user_id;
        if acting_for_other && !actor.is_admin() {
            return Err(GatekeeperError::forbidden(
                "You can only change your own password",
            ));
        }

        match change.current_password.as_deref() {
            Some(current) => {
                if !verify_password(current, &user.password_hash)? {
                    return Err(GatekeeperError::validation("Current password is incorrect"));
                }
            }
            None if acting_for_other => {}
            None => {
                return Err(GatekeeperError::validation("Current password is required"));
            }
        }

        self.storage
            .db()
            .update_user_password(user_id, &hash_password(&change.new_password)?)
            .await?;
        info!("Password changed for user {}", user.username);
        Ok(())
    }
}
