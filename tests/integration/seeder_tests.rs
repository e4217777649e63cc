//! Seeder integration tests

#[cfg(test)]
mod tests {
    use crate::common::TestDatabase;
    use crate::{assert_err, assert_ok};
    use gatekeeper::auth::rbac::RbacSystem;
    use gatekeeper::auth::seeder::{SeedDataset, Seeder};
    use gatekeeper::core::models::{RoleExpand, UserFilter};
    use gatekeeper::utils::error::GatekeeperError;
    use std::io::Write;

    const CUSTOM_DATASET: &str = r#"
version: 2
permissions:
  - resource: invoices
    action: read
  - resource: invoices
    action: approve
    description: Approve invoices
roles:
  - name: accountant
    grants:
      permissions: [invoices:read]
  - name: controller
    grants:
      actions: [read, approve]
      resources: [invoices]
users: []
"#;

    async fn counts(database: &TestDatabase) -> (usize, usize, u64) {
        let db = database.db();
        let roles = assert_ok!(db.list_roles(RoleExpand::Bare).await).len();
        let permissions = assert_ok!(db.list_permissions().await).len();
        let (_, users) = assert_ok!(db.list_users(&UserFilter::default()).await);
        (roles, permissions, users)
    }

    #[tokio::test]
    async fn test_builtin_seed_is_idempotent() {
        let database = TestDatabase::new().await;
        let seeder = Seeder::new(database.db_arc());

        let first = assert_ok!(seeder.run(&SeedDataset::builtin()).await);
        assert_eq!(first.permissions_created, 25);
        assert_eq!(first.roles_created, 5);
        assert_eq!(first.users_created, 1);
        let after_first = counts(&database).await;

        let second = assert_ok!(seeder.run(&SeedDataset::builtin()).await);
        assert_eq!(second.permissions_created, 0);
        assert_eq!(second.roles_created, 0);
        assert_eq!(second.users_created, 0);
        assert_eq!(counts(&database).await, after_first);
        assert_eq!(after_first, (5, 25, 1));
    }

    #[tokio::test]
    async fn test_bundled_yaml_file_seeds_builtin_baseline() {
        let database = TestDatabase::new().await;
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/seed/builtin.yaml");

        let dataset = assert_ok!(SeedDataset::from_file(path).await);
        assert_ok!(Seeder::new(database.db_arc()).run(&dataset).await);

        let rbac = RbacSystem::new(database.db_arc());
        let admin = assert_ok!(rbac.get_role_by_name("admin").await);
        assert!(admin.is_immutable());
        assert_eq!(admin.permissions().len(), 25);

        let viewer = assert_ok!(rbac.get_role_by_name("viewer").await);
        let mut names: Vec<_> = viewer.permissions().iter().map(|p| p.name.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["posts:read", "users:read"]);
    }

    #[tokio::test]
    async fn test_custom_dataset_from_file() {
        let database = TestDatabase::new().await;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CUSTOM_DATASET.as_bytes()).unwrap();

        let dataset = assert_ok!(SeedDataset::from_file(file.path()).await);
        let report = assert_ok!(Seeder::new(database.db_arc()).run(&dataset).await);
        assert_eq!(report.version, 2);
        assert_eq!(report.permissions_created, 2);
        assert_eq!(report.roles_created, 2);

        let rbac = RbacSystem::new(database.db_arc());
        let controller = assert_ok!(rbac.get_role_by_name("controller").await);
        assert_eq!(controller.permissions().len(), 2);
        let accountant = assert_ok!(rbac.get_role_by_name("accountant").await);
        assert_eq!(accountant.permissions().len(), 1);
    }

    #[tokio::test]
    async fn test_dataset_with_unknown_grant_is_rejected_before_writing() {
        let database = TestDatabase::new().await;
        let broken = CUSTOM_DATASET.replace("[invoices:read]", "[invoices:delete]");
        let err = assert_err!(SeedDataset::from_yaml_str(&broken));
        assert!(matches!(err, GatekeeperError::Validation(_)));

        let dataset: SeedDataset = serde_yaml::from_str(&broken).unwrap();
        let err = assert_err!(Seeder::new(database.db_arc()).run(&dataset).await);
        assert!(matches!(err, GatekeeperError::Validation(_)));
        assert_eq!(counts(&database).await, (0, 0, 0));
    }
}
