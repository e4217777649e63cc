//! Credential login and token renewal

use super::jwt::{INVALID_TOKEN, TokenPair, TokenType};
use super::system::AuthSystem;
use crate::core::models::User;
use crate::utils::auth::verify_password;
use crate::utils::error::{GatekeeperError, Result};
use serde::Serialize;
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Successful login
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: User,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

impl AuthSystem {
    /// Log in with email or username
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginResponse> {
        info!("User login attempt: {}", identifier);

        let user = self
            .storage
            .db()
            .find_user_by_login(identifier.trim())
            .await?
            .ok_or_else(|| {
                warn!("Login for unknown account {}", identifier);
                GatekeeperError::unauthenticated(INVALID_CREDENTIALS)
            })?;

        // A corrupt stored hash counts as a mismatch.
        if !verify_password(password, &user.password_hash).unwrap_or(false) {
            warn!("Wrong password for {}", user.username);
            return Err(GatekeeperError::unauthenticated(INVALID_CREDENTIALS));
        }

        if !user.is_active() {
            warn!("Login refused for {} account {}", user.status, user.username);
            return Err(GatekeeperError::unauthenticated("Account is not active"));
        }

        self.storage.db().update_user_last_login(user.id).await?;
        let tokens = self.jwt.create_token_pair(user.id)?;
        let user = self.get_user(user.id).await?;

        info!("User {} logged in", user.username);
        Ok(LoginResponse { user, tokens })
    }

    /// Exchange a refresh token for a fresh pair
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair> {
        let claims = self.jwt.verify_token(refresh_token, TokenType::Refresh)?;

        let user = self
            .storage
            .db()
            .find_user_by_id(claims.sub)
            .await?
            .filter(User::is_active)
            .ok_or_else(|| {
                warn!("Refresh for missing or inactive user {}", claims.sub);
                GatekeeperError::unauthenticated(INVALID_TOKEN)
            })?;

        self.jwt.create_token_pair(user.id)
    }
}
