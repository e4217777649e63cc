//! Identity resolution from bearer tokens

use crate::auth::jwt::{INVALID_TOKEN, JwtHandler, TokenType};
use crate::auth::rbac::{effective_permissions, effective_roles};
use crate::core::models::{ADMIN_ROLE, BindingFilter, UserAccess};
use crate::storage::database::Database;
use crate::utils::error::{GatekeeperError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Authenticated caller with its effective roles and permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    /// Sorted role names from active bindings
    pub roles: Vec<String>,
    /// Sorted `resource:action` keys from active bindings
    pub permissions: Vec<String>,
}

impl Identity {
    pub fn from_access(access: &UserAccess) -> Self {
        Self {
            id: access.user.id,
            email: access.user.email.clone(),
            username: access.user.username.clone(),
            roles: effective_roles(&access.bindings).into_iter().collect(),
            permissions: effective_permissions(&access.bindings).into_iter().collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}

/// Turns access tokens into identities
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    jwt: Arc<JwtHandler>,
    database: Arc<Database>,
}

impl IdentityResolver {
    pub fn new(jwt: Arc<JwtHandler>, database: Arc<Database>) -> Self {
        Self { jwt, database }
    }

    /// Verify the token and load the subject's active access graph
    ///
    /// Bad tokens, unknown subjects and non-active accounts are all the same
    /// `Unauthenticated` error.
    pub async fn resolve(&self, token: &str) -> Result<Identity> {
        let claims = self.jwt.verify_token(token, TokenType::Access)?;

        let access = self
            .database
            .load_user_access(claims.sub, BindingFilter::ActiveOnly)
            .await?
            .ok_or_else(|| {
                warn!("Token subject {} does not exist", claims.sub);
                GatekeeperError::unauthenticated(INVALID_TOKEN)
            })?;

        if !access.user.is_active() {
            warn!(
                "Token subject {} is not active ({})",
                access.user.id, access.user.status
            );
            return Err(GatekeeperError::unauthenticated(INVALID_TOKEN));
        }

        let identity = Identity::from_access(&access);
        debug!(
            "Resolved identity {} with {} role(s), {} permission(s)",
            identity.id,
            identity.roles.len(),
            identity.permissions.len()
        );
        Ok(identity)
    }

    /// Resolve from a raw `Authorization` header value
    pub async fn resolve_header(&self, header_value: &str) -> Result<Identity> {
        let token = JwtHandler::extract_token_from_header(header_value).ok_or_else(|| {
            warn!("Malformed Authorization header");
            GatekeeperError::unauthenticated(INVALID_TOKEN)
        })?;
        self.resolve(token).await
    }
}
