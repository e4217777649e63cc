//! Core JWT handler implementation

use super::types::{Claims, JwtHandler, TokenPair, TokenType};
use crate::config::AuthConfig;
use crate::utils::error::{GatekeeperError, Result};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};
use uuid::Uuid;

/// The only message a caller sees for a rejected token
pub const INVALID_TOKEN: &str = "Invalid or expired token";

impl JwtHandler {
    /// Create a new JWT handler
    pub fn new(config: &AuthConfig) -> Result<Self> {
        if config.jwt_secret.is_empty() {
            return Err(GatekeeperError::config("JWT secret is required"));
        }
        let secret = config.jwt_secret.as_bytes();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            expiration: config.jwt_expiration,
            refresh_expiration: config.refresh_expiration,
            issuer: config.issuer.clone(),
        })
    }

    /// Issue a token of the given type for a user
    pub fn create_token(&self, user_id: Uuid, token_type: TokenType) -> Result<String> {
        let now = now_secs()?;
        let lifetime = match token_type {
            TokenType::Access => self.expiration,
            TokenType::Refresh => self.refresh_expiration,
        };

        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now + lifetime,
            iss: self.issuer.clone(),
            aud: token_type.audience().to_string(),
            jti: Uuid::new_v4().to_string(),
            token_type,
        };

        let token = self.sign(&claims)?;
        debug!("Created {:?} token for user: {}", token_type, user_id);
        Ok(token)
    }

    /// Issue an access and refresh token pair
    pub fn create_token_pair(&self, user_id: Uuid) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.create_token(user_id, TokenType::Access)?,
            refresh_token: self.create_token(user_id, TokenType::Refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: self.expiration,
        })
    }

    /// Verify signature, expiry, issuer and audience
    ///
    /// Every failure is `Unauthenticated`; the reason is only logged.
    pub fn verify_token(&self, token: &str, expected: TokenType) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[expected.audience()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => warn!("Rejected expired {:?} token", expected),
                _ => warn!("JWT verification failed: {}", e),
            }
            GatekeeperError::unauthenticated(INVALID_TOKEN)
        })?;

        if token_data.claims.token_type != expected {
            warn!("Token type mismatch: expected {:?}", expected);
            return Err(GatekeeperError::unauthenticated(INVALID_TOKEN));
        }

        debug!("Token verified for user: {}", token_data.claims.sub);
        Ok(token_data.claims)
    }

    /// Extract token from Authorization header
    pub fn extract_token_from_header(header_value: &str) -> Option<&str> {
        header_value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Access token lifetime in seconds
    pub fn expiration(&self) -> u64 {
        self.expiration
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| GatekeeperError::internal(format!("Failed to sign token: {}", e)))
    }
}

pub(crate) fn now_secs() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| GatekeeperError::internal(format!("System time error: {}", e)))
}
