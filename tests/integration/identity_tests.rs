//! Identity resolution tests

#[cfg(test)]
mod tests {
    use crate::common::TestApp;
    use crate::{assert_err, assert_ok};
    use gatekeeper::auth::jwt::{Claims, INVALID_TOKEN, TokenType};
    use gatekeeper::auth::StatusChange;
    use gatekeeper::core::models::UserStatus;
    use gatekeeper::utils::error::GatekeeperError;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use std::time::{SystemTime, UNIX_EPOCH};
    use uuid::Uuid;

    fn signed_claims(app: &TestApp, claims: &Claims) -> String {
        let secret = app.state.config.auth().jwt_secret.as_bytes();
        encode(&Header::default(), claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn claims_for(app: &TestApp, user_id: Uuid, exp_offset: i64) -> Claims {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        Claims {
            sub: user_id,
            iat: (now - 7200) as u64,
            exp: (now + exp_offset) as u64,
            iss: app.state.config.auth().issuer.clone(),
            aud: TokenType::Access.audience().to_string(),
            jti: Uuid::new_v4().to_string(),
            token_type: TokenType::Access,
        }
    }

    #[tokio::test]
    async fn test_resolves_seeded_admin() {
        let app = TestApp::new().await;
        let token = app.admin_token().await;

        let identity = assert_ok!(app.auth().identity().resolve(&token).await);
        assert_eq!(identity.username, "admin");
        assert!(identity.is_admin());
        assert!(identity.has_permission("system:backup"));
        assert_eq!(identity.permissions.len(), 25);

        let via_header = assert_ok!(
            app.auth()
                .identity()
                .resolve_header(&format!("Bearer {}", token))
                .await
        );
        assert_eq!(via_header.id, identity.id);
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthenticated() {
        let app = TestApp::new().await;
        let (user, _) = app.token_for_roles(&[app.role_id("viewer").await]).await;

        let expired = signed_claims(&app, &claims_for(&app, user.id, -3600));
        let err = assert_err!(app.auth().identity().resolve(&expired).await);
        assert!(matches!(err, GatekeeperError::Unauthenticated(ref m) if m == INVALID_TOKEN));

        let valid = signed_claims(&app, &claims_for(&app, user.id, 3600));
        assert_ok!(app.auth().identity().resolve(&valid).await);
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let app = TestApp::new().await;
        let (user, _) = app.token_for_roles(&[]).await;
        let pair = assert_ok!(app.auth().jwt().create_token_pair(user.id));

        let err = assert_err!(app.auth().identity().resolve(&pair.refresh_token).await);
        assert!(matches!(err, GatekeeperError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_unknown_and_inactive_subjects_are_unauthenticated() {
        let app = TestApp::new().await;

        let ghost = assert_ok!(app.auth().jwt().create_token(Uuid::new_v4(), TokenType::Access));
        let err = assert_err!(app.auth().identity().resolve(&ghost).await);
        assert!(matches!(err, GatekeeperError::Unauthenticated(ref m) if m == INVALID_TOKEN));

        let (user, token) = app.token_for_roles(&[app.role_id("user").await]).await;
        assert_ok!(app.auth().identity().resolve(&token).await);

        assert_ok!(
            app.auth()
                .update_user_status(
                    user.id,
                    StatusChange {
                        status: UserStatus::Suspended,
                        reason: None,
                    },
                    None,
                )
                .await
        );
        let err = assert_err!(app.auth().identity().resolve(&token).await);
        assert!(matches!(err, GatekeeperError::Unauthenticated(ref m) if m == INVALID_TOKEN));
    }

    #[tokio::test]
    async fn test_inactive_binding_drops_out_of_identity() {
        let app = TestApp::new().await;
        let editor = app.role_id("editor").await;
        let (user, token) = app.token_for_roles(&[editor]).await;

        let identity = assert_ok!(app.auth().identity().resolve(&token).await);
        assert!(identity.has_role("editor"));
        assert!(identity.has_permission("posts:update"));

        assert_ok!(app.auth().rbac().set_user_role_active(user.id, editor, false).await);

        let identity = assert_ok!(app.auth().identity().resolve(&token).await);
        assert!(identity.roles.is_empty());
        assert!(identity.permissions.is_empty());
    }
}
