//! RBAC engine integration tests
//!
//! Runs the engine against a real in-memory store.

#[cfg(test)]
mod tests {
    use crate::common::{TestDatabase, UserFactory};
    use crate::{assert_err, assert_ok};
    use gatekeeper::auth::rbac::{NewPermission, NewRole, RbacSystem, RolePatch};
    use gatekeeper::core::models::Role;
    use gatekeeper::utils::error::GatekeeperError;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::{BTreeMap, BTreeSet};
    use uuid::Uuid;

    async fn setup() -> (TestDatabase, RbacSystem) {
        let database = TestDatabase::new().await;
        let rbac = RbacSystem::new(database.db_arc());
        (database, rbac)
    }

    async fn protected_admin(database: &TestDatabase) -> Role {
        let mut role = Role::new("admin", Some("Administrator".to_string()));
        role.is_protected = true;
        assert_ok!(database.db().insert_role(&role, &[]).await)
    }

    #[tokio::test]
    async fn test_reports_permission_lifecycle() {
        let (database, rbac) = setup().await;

        let permission = assert_ok!(
            rbac.create_permission(NewPermission::new("reports", "read"))
                .await
        );
        assert_eq!(permission.name, "reports:read");

        let auditor = assert_ok!(
            rbac.create_role(NewRole::new("auditor").with_permissions(vec![permission.id]))
                .await
        );
        let user = UserFactory::create(database.db(), &[]).await;
        assert_ok!(rbac.assign_role_to_user(user.id, auditor.id).await);

        assert!(assert_ok!(rbac.has_permission(user.id, "reports", "read").await));

        assert_ok!(
            rbac.remove_permissions_from_role(auditor.id, &[permission.id])
                .await
        );
        assert!(!assert_ok!(rbac.has_permission(user.id, "reports", "read").await));
        assert!(assert_ok!(rbac.has_role(user.id, "auditor").await));
    }

    #[tokio::test]
    async fn test_protected_admin_is_immutable() {
        let (database, rbac) = setup().await;
        let admin = protected_admin(&database).await;
        let permission = assert_ok!(
            rbac.create_permission(NewPermission::new("posts", "read"))
                .await
        );

        let patch = RolePatch {
            description: Some("changed".to_string()),
            ..RolePatch::default()
        };
        let results = [
            rbac.update_role(admin.id, patch).await.map(|_| ()),
            rbac.delete_role(admin.id).await,
            rbac.add_permissions_to_role(admin.id, &[permission.id])
                .await
                .map(|_| ()),
            rbac.remove_permissions_from_role(admin.id, &[permission.id])
                .await
                .map(|_| ()),
        ];
        for result in results {
            assert!(matches!(result, Err(GatekeeperError::Forbidden(_))));
        }

        let unchanged = assert_ok!(rbac.get_role_by_id(admin.id).await);
        assert_eq!(unchanged.description.as_deref(), Some("Administrator"));
        assert!(unchanged.permissions().is_empty());
    }

    #[tokio::test]
    async fn test_second_identical_assignment_conflicts() {
        let (database, rbac) = setup().await;
        let role = assert_ok!(rbac.create_role(NewRole::new("editor")).await);
        let user = UserFactory::create(database.db(), &[]).await;

        assert_ok!(rbac.assign_role_to_user(user.id, role.id).await);
        let err = assert_err!(rbac.assign_role_to_user(user.id, role.id).await);
        assert!(matches!(err, GatekeeperError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_role_blocked_while_bound() {
        let (database, rbac) = setup().await;
        let role = assert_ok!(rbac.create_role(NewRole::new("temp")).await);
        let user = UserFactory::create(database.db(), &[role.id]).await;

        let err = assert_err!(rbac.delete_role(role.id).await);
        assert!(matches!(err, GatekeeperError::Conflict(_)));

        assert_ok!(rbac.remove_role_from_user(user.id, role.id).await);
        assert_ok!(rbac.delete_role(role.id).await);
        assert!(matches!(
            rbac.get_role_by_id(role.id).await,
            Err(GatekeeperError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_inactive_binding_is_ignored() {
        let (database, rbac) = setup().await;
        let permission = assert_ok!(
            rbac.create_permission(NewPermission::new("posts", "update"))
                .await
        );
        let role = assert_ok!(
            rbac.create_role(NewRole::new("editor").with_permissions(vec![permission.id]))
                .await
        );
        let user = UserFactory::create(database.db(), &[role.id]).await;

        let binding = assert_ok!(rbac.set_user_role_active(user.id, role.id, false).await);
        assert!(!binding.is_active);

        assert!(assert_ok!(rbac.get_user_permissions(user.id).await).is_empty());
        assert!(!assert_ok!(rbac.has_role(user.id, "editor").await));
        assert!(assert_ok!(rbac.get_user_roles(user.id).await).is_empty());

        assert_ok!(rbac.set_user_role_active(user.id, role.id, true).await);
        assert_eq!(
            assert_ok!(rbac.get_user_permissions(user.id).await),
            vec!["posts:update".to_string()]
        );
    }

    #[tokio::test]
    async fn test_concurrent_create_role_single_winner() {
        let (_database, rbac) = setup().await;

        let (first, second) = tokio::join!(
            rbac.create_role(NewRole::new("racer")),
            rbac.create_role(NewRole::new("racer"))
        );

        let outcomes = [first, second];
        let created = outcomes.iter().filter(|r| r.is_ok()).count();
        let conflicts = outcomes
            .iter()
            .filter(|r| matches!(r, Err(GatekeeperError::Conflict(_))))
            .count();
        assert_eq!(created, 1);
        assert_eq!(conflicts, 1);
        assert_eq!(assert_ok!(rbac.get_all_roles().await).len(), 1);
    }

    /// `has_permission` agrees with `get_user_permissions` and with an
    /// independently computed model on random graphs.
    #[tokio::test]
    async fn test_has_permission_matches_effective_set_on_random_graphs() {
        const RESOURCES: [&str; 4] = ["posts", "users", "reports", "settings"];
        const ACTIONS: [&str; 3] = ["create", "read", "delete"];

        for seed in 0..4u64 {
            let (database, rbac) = setup().await;
            let mut rng = StdRng::seed_from_u64(seed);

            let mut permissions = Vec::new();
            for resource in RESOURCES {
                for action in ACTIONS {
                    if rng.gen_bool(0.7) {
                        let p = assert_ok!(
                            rbac.create_permission(NewPermission::new(resource, action))
                                .await
                        );
                        permissions.push(p);
                    }
                }
            }

            let mut grants: BTreeMap<Uuid, BTreeSet<String>> = BTreeMap::new();
            let mut role_ids = Vec::new();
            for index in 0..rng.gen_range(1..5) {
                let chosen: Vec<_> = permissions.iter().filter(|_| rng.gen_bool(0.4)).collect();
                let role = assert_ok!(
                    rbac.create_role(
                        NewRole::new(format!("role-{}", index))
                            .with_permissions(chosen.iter().map(|p| p.id).collect())
                    )
                    .await
                );
                grants.insert(role.id, chosen.iter().map(|p| p.name.clone()).collect());
                role_ids.push(role.id);
            }

            for _ in 0..3 {
                let user = UserFactory::create(database.db(), &[]).await;
                let mut expected = BTreeSet::new();

                for role_id in &role_ids {
                    if !rng.gen_bool(0.5) {
                        continue;
                    }
                    assert_ok!(rbac.assign_role_to_user(user.id, *role_id).await);
                    if rng.gen_bool(0.25) {
                        assert_ok!(rbac.set_user_role_active(user.id, *role_id, false).await);
                    } else {
                        expected.extend(grants[role_id].iter().cloned());
                    }
                }

                let effective = assert_ok!(rbac.get_user_permissions(user.id).await);
                assert_eq!(
                    effective.iter().cloned().collect::<BTreeSet<_>>(),
                    expected,
                    "seed {}",
                    seed
                );
                assert_eq!(effective, assert_ok!(rbac.get_user_permissions(user.id).await));

                for resource in RESOURCES {
                    for action in ACTIONS {
                        let key = format!("{}:{}", resource, action);
                        assert_eq!(
                            assert_ok!(rbac.has_permission(user.id, resource, action).await),
                            effective.contains(&key),
                            "seed {} permission {}",
                            seed,
                            key
                        );
                    }
                }
            }
        }
    }
}
