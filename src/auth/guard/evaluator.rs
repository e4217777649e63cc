//! Requirement evaluation

use super::requirements::AccessRequirement;
use crate::auth::identity::Identity;
use crate::auth::rbac::RbacSystem;
use crate::core::models::ADMIN_ROLE;
use crate::utils::error::{GatekeeperError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Source of truth for the two access predicates
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessEvaluator: Send + Sync {
    async fn has_role(&self, user_id: Uuid, role: &str) -> Result<bool>;

    async fn has_permission(&self, user_id: Uuid, resource: &str, action: &str) -> Result<bool>;
}

#[async_trait]
impl AccessEvaluator for RbacSystem {
    async fn has_role(&self, user_id: Uuid, role: &str) -> Result<bool> {
        RbacSystem::has_role(self, user_id, role).await
    }

    async fn has_permission(&self, user_id: Uuid, resource: &str, action: &str) -> Result<bool> {
        RbacSystem::has_permission(self, user_id, resource, action).await
    }
}

/// Enforces declared requirements against a resolved identity
#[derive(Clone)]
pub struct AccessGuard {
    evaluator: Arc<dyn AccessEvaluator>,
}

impl std::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard").finish_non_exhaustive()
    }
}

impl AccessGuard {
    pub fn new(evaluator: Arc<dyn AccessEvaluator>) -> Self {
        Self { evaluator }
    }

    /// Allow or deny one operation
    ///
    /// `owner_id` is the value of the requirement's owner parameter, when the
    /// route has one.
    pub async fn check(
        &self,
        requirement: &AccessRequirement,
        identity: Option<&Identity>,
        owner_id: Option<Uuid>,
    ) -> Result<()> {
        if requirement.is_empty() {
            return Ok(());
        }

        let Some(identity) = identity else {
            warn!("Rejected anonymous request to a guarded operation");
            return Err(GatekeeperError::unauthenticated("Authentication required"));
        };

        if requirement.owner_param.is_some() {
            return self.check_owner_or_admin(identity, owner_id).await;
        }

        if !requirement.roles.is_empty() {
            self.check_any_role(identity, &requirement.roles).await?;
        }

        for permission in &requirement.permissions {
            self.check_permission(identity, permission).await?;
        }

        debug!("Access granted to user {}", identity.id);
        Ok(())
    }

    async fn check_any_role(&self, identity: &Identity, roles: &[String]) -> Result<()> {
        for role in roles {
            if self.evaluator.has_role(identity.id, role).await? {
                return Ok(());
            }
        }

        warn!("User {} lacks every role of [{}]", identity.id, roles.join(", "));
        Err(GatekeeperError::forbidden(format!(
            "Access denied. Required roles: {}",
            roles.join(", ")
        )))
    }

    async fn check_permission(&self, identity: &Identity, permission: &str) -> Result<()> {
        let granted = match permission.split_once(':') {
            Some((resource, action)) => {
                self.evaluator
                    .has_permission(identity.id, resource, action)
                    .await?
            }
            None => false,
        };

        if !granted {
            warn!("User {} lacks permission {}", identity.id, permission);
            return Err(GatekeeperError::forbidden(format!(
                "Access denied. Missing permission: {}",
                permission
            )));
        }
        Ok(())
    }

    async fn check_owner_or_admin(&self, identity: &Identity, owner_id: Option<Uuid>) -> Result<()> {
        if self.evaluator.has_role(identity.id, ADMIN_ROLE).await? {
            return Ok(());
        }
        if owner_id == Some(identity.id) {
            return Ok(());
        }

        warn!("User {} is neither owner nor admin", identity.id);
        Err(GatekeeperError::forbidden(
            "You can only access your own resources",
        ))
    }
}
