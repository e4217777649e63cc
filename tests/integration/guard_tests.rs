//! Access guard tests against the real RBAC engine

#[cfg(test)]
mod tests {
    use crate::common::TestApp;
    use crate::{assert_err, assert_ok};
    use gatekeeper::auth::{AccessRequirement, Identity};
    use gatekeeper::utils::error::GatekeeperError;

    async fn identity_with_roles(app: &TestApp, roles: &[&str]) -> Identity {
        let mut role_ids = Vec::new();
        for role in roles {
            role_ids.push(app.role_id(role).await);
        }
        let (_, token) = app.token_for_roles(&role_ids).await;
        assert_ok!(app.auth().identity().resolve(&token).await)
    }

    #[tokio::test]
    async fn test_roles_are_alternatives() {
        let app = TestApp::new().await;
        let editor = identity_with_roles(&app, &["editor"]).await;
        let guard = app.auth().guard();

        assert_ok!(
            guard
                .check(
                    &AccessRequirement::any_role(["admin", "editor"]),
                    Some(&editor),
                    None
                )
                .await
        );
        let err = assert_err!(
            guard
                .check(
                    &AccessRequirement::any_role(["admin", "manager"]),
                    Some(&editor),
                    None
                )
                .await
        );
        assert!(matches!(err, GatekeeperError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_permissions_are_all_required() {
        let app = TestApp::new().await;
        let editor = identity_with_roles(&app, &["editor"]).await;
        let guard = app.auth().guard();

        assert_ok!(
            guard
                .check(
                    &AccessRequirement::all_permissions(["posts:create", "users:read"]),
                    Some(&editor),
                    None
                )
                .await
        );
        let err = assert_err!(
            guard
                .check(
                    &AccessRequirement::all_permissions(["posts:create", "posts:delete"]),
                    Some(&editor),
                    None
                )
                .await
        );
        assert!(matches!(err, GatekeeperError::Forbidden(ref m) if m.contains("posts:delete")));
    }

    #[tokio::test]
    async fn test_role_and_permission_requirements_both_apply() {
        let app = TestApp::new().await;
        let manager = identity_with_roles(&app, &["manager"]).await;
        let guard = app.auth().guard();

        let requirement =
            AccessRequirement::any_role(["manager"]).and_permissions(["reports:read"]);
        assert_ok!(guard.check(&requirement, Some(&manager), None).await);

        let requirement =
            AccessRequirement::any_role(["manager"]).and_permissions(["system:backup"]);
        let err = assert_err!(guard.check(&requirement, Some(&manager), None).await);
        assert!(matches!(err, GatekeeperError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthenticated() {
        let app = TestApp::new().await;
        let guard = app.auth().guard();

        assert_ok!(guard.check(&AccessRequirement::none(), None, None).await);

        let err = assert_err!(
            guard
                .check(&AccessRequirement::all_permissions(["posts:read"]), None, None)
                .await
        );
        assert!(matches!(err, GatekeeperError::Unauthenticated(_)));
    }

    #[tokio::test]
    async fn test_owner_or_admin() {
        let app = TestApp::new().await;
        let owner = identity_with_roles(&app, &["user"]).await;
        let stranger = identity_with_roles(&app, &["user"]).await;
        let admin = identity_with_roles(&app, &["admin"]).await;
        let guard = app.auth().guard();
        let requirement = AccessRequirement::owner_or_admin("id");

        assert_ok!(guard.check(&requirement, Some(&owner), Some(owner.id)).await);
        assert_ok!(guard.check(&requirement, Some(&admin), Some(owner.id)).await);
        let err = assert_err!(guard.check(&requirement, Some(&stranger), Some(owner.id)).await);
        assert!(matches!(err, GatekeeperError::Forbidden(_)));
    }
}
