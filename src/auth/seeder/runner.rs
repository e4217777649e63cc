//! Seeder execution

use super::dataset::{SeedDataset, SeedRole, SeedUser};
use crate::core::models::{Permission, Role, RoleExpand, User};
use crate::storage::database::Database;
use crate::utils::auth::hash_password;
use crate::utils::error::{GatekeeperError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// What one seeding run changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub version: u32,
    pub permissions_created: usize,
    pub roles_created: usize,
    pub roles_updated: usize,
    pub users_created: usize,
}

/// Applies a [`SeedDataset`] to the store
#[derive(Debug, Clone)]
pub struct Seeder {
    database: Arc<Database>,
}

impl Seeder {
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Bring the store in line with the dataset; safe to run repeatedly
    pub async fn run(&self, dataset: &SeedDataset) -> Result<SeedReport> {
        dataset.validate()?;
        info!("Seeding dataset version {}", dataset.version);

        let mut report = SeedReport {
            version: dataset.version,
            ..SeedReport::default()
        };

        for seed in &dataset.permissions {
            if self.database.find_permission_by_name(&seed.name()).await?.is_some() {
                continue;
            }
            let permission = Permission::new(&seed.resource, &seed.action, seed.description.clone());
            match self.database.insert_permission(&permission).await {
                Ok(_) => report.permissions_created += 1,
                Err(GatekeeperError::Conflict(_)) => {
                    debug!("Permission {} was created concurrently", permission.name)
                }
                Err(e) => return Err(e),
            }
        }

        let permission_ids: HashMap<String, Uuid> = self
            .database
            .list_permissions()
            .await?
            .into_iter()
            .map(|permission| (permission.name, permission.id))
            .collect();

        for seed in &dataset.roles {
            let granted: Vec<Uuid> = seed
                .grants
                .resolve(&dataset.permissions)
                .iter()
                .filter_map(|name| permission_ids.get(name).copied())
                .collect();
            self.seed_role(seed, &granted, &mut report).await?;
        }

        for seed in &dataset.users {
            self.seed_user(seed, &mut report).await?;
        }

        info!(
            "Seeding complete: {} permission(s), {} role(s) created, {} role(s) updated, {} user(s) created",
            report.permissions_created, report.roles_created, report.roles_updated, report.users_created
        );
        Ok(report)
    }

    async fn seed_role(&self, seed: &SeedRole, granted: &[Uuid], report: &mut SeedReport) -> Result<()> {
        match self.database.find_role_by_name(&seed.name, RoleExpand::Bare).await? {
            None => {
                let mut role = Role::new(&seed.name, seed.description.clone());
                role.is_protected = seed.protected;
                match self.database.insert_role(&role, granted).await {
                    Ok(_) => report.roles_created += 1,
                    Err(GatekeeperError::Conflict(_)) => {
                        debug!("Role {} was created concurrently", role.name)
                    }
                    Err(e) => return Err(e),
                }
            }
            Some(existing) if existing.is_immutable() => {
                debug!("Leaving protected role {} untouched", existing.name);
            }
            Some(mut existing) => {
                existing.description = seed.description.clone();
                existing.updated_at = chrono::Utc::now();
                self.database.update_role(&existing, Some(granted)).await?;
                report.roles_updated += 1;
            }
        }
        Ok(())
    }

    async fn seed_user(&self, seed: &SeedUser, report: &mut SeedReport) -> Result<()> {
        if self.database.find_user_by_login(&seed.email).await?.is_some()
            || self.database.find_user_by_login(&seed.username).await?.is_some()
        {
            debug!("Seed user {} already exists", seed.username);
            return Ok(());
        }

        let mut role_ids = Vec::with_capacity(seed.roles.len());
        for name in &seed.roles {
            let role = self
                .database
                .find_role_by_name(name, RoleExpand::Bare)
                .await?
                .ok_or_else(|| GatekeeperError::not_found(format!("Role '{}' not found", name)))?;
            role_ids.push(role.id);
        }

        let mut user = User::new(&seed.email, &seed.username, hash_password(&seed.password)?);
        user.first_name = seed.first_name.clone();
        user.last_name = seed.last_name.clone();
        user.is_verified = true;
        self.database.insert_user(&user, &role_ids).await?;
        report.users_created += 1;

        warn!(
            "Created seed user {} with the dataset password; change it after first login",
            seed.username
        );
        Ok(())
    }
}
