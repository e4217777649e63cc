//! Test fixtures and data factories

use super::database::TestDatabase;
use gatekeeper::auth::seeder::SeedDataset;
use gatekeeper::auth::AuthSystem;
use gatekeeper::config::Config;
use gatekeeper::core::models::User;
use gatekeeper::server::AppState;
use gatekeeper::storage::StorageLayer;
use gatekeeper::storage::database::Database;
use std::sync::Arc;
use uuid::Uuid;

pub const ADMIN_LOGIN: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Factory for account rows written straight to the store
///
/// The stored hash is not a real argon2 hash, so these users cannot log in;
/// use [`AuthSystem::create_user`] when a test needs credentials.
pub struct UserFactory;

impl UserFactory {
    pub fn build() -> User {
        let tag = &Uuid::new_v4().simple().to_string()[..8];
        User::new(
            format!("user-{}@example.com", tag),
            format!("user_{}", tag),
            "not-a-real-hash".to_string(),
        )
    }

    /// Insert a user holding the given role ids
    pub async fn create(db: &Database, role_ids: &[Uuid]) -> User {
        db.insert_user(&Self::build(), role_ids)
            .await
            .expect("Failed to insert test user")
    }
}

/// A fully wired, seeded application backed by an in-memory database
pub struct TestApp {
    pub database: TestDatabase,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        let database = TestDatabase::new().await;
        let config = Config::default();
        let storage = Arc::new(StorageLayer::from_database(database.db_arc()));
        let auth = AuthSystem::new(config.auth(), storage.clone())
            .expect("Failed to build auth system");
        auth.seeder()
            .run(&SeedDataset::builtin())
            .await
            .expect("Failed to seed builtin dataset");

        Self {
            database,
            state: AppState::new(config, auth, storage),
        }
    }

    pub fn auth(&self) -> &AuthSystem {
        &self.state.auth
    }

    pub async fn admin_token(&self) -> String {
        self.auth()
            .login(ADMIN_LOGIN, ADMIN_PASSWORD)
            .await
            .expect("Admin login failed")
            .tokens
            .access_token
    }

    /// Access token for a fresh user holding the given role ids
    pub async fn token_for_roles(&self, role_ids: &[Uuid]) -> (User, String) {
        let user = UserFactory::create(self.database.db(), role_ids).await;
        let token = self
            .auth()
            .jwt()
            .create_token_pair(user.id)
            .expect("Failed to issue token")
            .access_token;
        (user, token)
    }

    pub async fn role_id(&self, name: &str) -> Uuid {
        self.auth()
            .rbac()
            .get_role_by_name(name)
            .await
            .expect("Seeded role missing")
            .id
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
