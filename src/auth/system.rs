//! Main authentication system

use super::guard::AccessGuard;
use super::identity::IdentityResolver;
use super::jwt::JwtHandler;
use super::rbac::RbacSystem;
use super::seeder::Seeder;
use crate::config::AuthConfig;
use crate::storage::StorageLayer;
use crate::utils::error::Result;
use std::sync::Arc;
use tracing::info;

/// Shared handle to every auth component
#[derive(Debug, Clone)]
pub struct AuthSystem {
    /// Storage layer for user data
    pub(super) storage: Arc<StorageLayer>,
    /// JWT handler
    pub(super) jwt: Arc<JwtHandler>,
    pub(super) identity: IdentityResolver,
    /// RBAC engine
    pub(super) rbac: Arc<RbacSystem>,
    pub(super) guard: AccessGuard,
}

impl AuthSystem {
    /// Create a new authentication system
    pub fn new(config: &AuthConfig, storage: Arc<StorageLayer>) -> Result<Self> {
        info!("Initializing authentication system");

        let database = storage.database.clone();
        let jwt = Arc::new(JwtHandler::new(config)?);
        let identity = IdentityResolver::new(jwt.clone(), database.clone());
        let rbac = Arc::new(RbacSystem::new(database));
        let guard = AccessGuard::new(rbac.clone());

        info!("Authentication system initialized successfully");
        Ok(Self {
            storage,
            jwt,
            identity,
            rbac,
            guard,
        })
    }

    pub fn jwt(&self) -> &JwtHandler {
        &self.jwt
    }

    pub fn identity(&self) -> &IdentityResolver {
        &self.identity
    }

    pub fn rbac(&self) -> &RbacSystem {
        &self.rbac
    }

    pub fn guard(&self) -> &AccessGuard {
        &self.guard
    }

    pub fn seeder(&self) -> Seeder {
        Seeder::new(self.storage.database.clone())
    }
}
