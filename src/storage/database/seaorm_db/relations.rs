//! Relation expansion shared by the read paths
//!
//! Every helper takes a generic connection so callers can run a whole
//! expansion inside one transaction and get a consistent snapshot.

use crate::core::models::{BindingExpand, Permission, Role, RoleExpand, UserRoleBinding};
use crate::utils::error::Result;
use sea_orm::*;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::super::entities::{self, permission, role, role_permission, user_role};

/// Permissions granted to each of the given roles, sorted by name
pub(super) async fn permissions_by_role<C: ConnectionTrait>(
    conn: &C,
    role_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Permission>>> {
    let mut by_role: HashMap<Uuid, Vec<Permission>> =
        role_ids.iter().map(|id| (*id, Vec::new())).collect();
    if role_ids.is_empty() {
        return Ok(by_role);
    }

    let links = entities::RolePermission::find()
        .filter(role_permission::Column::RoleId.is_in(role_ids.iter().copied()))
        .all(conn)
        .await?;

    let permission_ids: HashSet<Uuid> = links.iter().map(|l| l.permission_id).collect();
    let permissions: HashMap<Uuid, Permission> = if permission_ids.is_empty() {
        HashMap::new()
    } else {
        entities::Permission::find()
            .filter(permission::Column::Id.is_in(permission_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|model| (model.id, model.to_domain_permission()))
            .collect()
    };

    for link in links {
        if let Some(permission) = permissions.get(&link.permission_id) {
            by_role
                .entry(link.role_id)
                .or_default()
                .push(permission.clone());
        }
    }
    for list in by_role.values_mut() {
        list.sort_by(|a, b| a.name.cmp(&b.name));
    }

    Ok(by_role)
}

/// Convert role rows to domain roles, loading permissions when asked
pub(super) async fn expand_roles<C: ConnectionTrait>(
    conn: &C,
    models: Vec<role::Model>,
    expand: RoleExpand,
) -> Result<Vec<Role>> {
    match expand {
        RoleExpand::Bare => Ok(models.iter().map(|m| m.to_domain_role(None)).collect()),
        RoleExpand::Permissions => {
            let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
            let mut by_role = permissions_by_role(conn, &ids).await?;
            Ok(models
                .iter()
                .map(|m| m.to_domain_role(Some(by_role.remove(&m.id).unwrap_or_default())))
                .collect())
        }
    }
}

/// Convert binding rows to domain bindings, loading roles when asked
pub(super) async fn expand_bindings<C: ConnectionTrait>(
    conn: &C,
    models: Vec<user_role::Model>,
    expand: BindingExpand,
) -> Result<Vec<UserRoleBinding>> {
    let role_expand = match expand {
        BindingExpand::Bare => {
            return Ok(models.iter().map(|m| m.to_domain_binding(None)).collect());
        }
        BindingExpand::Role => RoleExpand::Bare,
        BindingExpand::RoleAndPermissions => RoleExpand::Permissions,
    };

    let role_ids: HashSet<Uuid> = models.iter().map(|m| m.role_id).collect();
    let role_models = if role_ids.is_empty() {
        Vec::new()
    } else {
        entities::Role::find()
            .filter(role::Column::Id.is_in(role_ids))
            .all(conn)
            .await?
    };
    let roles: HashMap<Uuid, Role> = expand_roles(conn, role_models, role_expand)
        .await?
        .into_iter()
        .map(|r| (r.id, r))
        .collect();

    Ok(models
        .iter()
        .map(|m| m.to_domain_binding(roles.get(&m.role_id).cloned()))
        .collect())
}

/// Subset of `ids` that exist as permissions, in input order without repeats
pub(super) async fn existing_permission_ids<C: ConnectionTrait>(
    conn: &C,
    ids: &[Uuid],
) -> Result<Vec<Uuid>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let found: HashSet<Uuid> = entities::Permission::find()
        .select_only()
        .column(permission::Column::Id)
        .filter(permission::Column::Id.is_in(ids.iter().copied()))
        .into_tuple::<Uuid>()
        .all(conn)
        .await?
        .into_iter()
        .collect();

    let mut seen = HashSet::new();
    Ok(ids
        .iter()
        .copied()
        .filter(|id| found.contains(id) && seen.insert(*id))
        .collect())
}

/// Insert role to permission links
pub(super) async fn link_permissions<C: ConnectionTrait>(
    conn: &C,
    role_id: Uuid,
    permission_ids: &[Uuid],
) -> Result<()> {
    if permission_ids.is_empty() {
        return Ok(());
    }

    let links = permission_ids.iter().map(|permission_id| role_permission::ActiveModel {
        role_id: Set(role_id),
        permission_id: Set(*permission_id),
    });

    entities::RolePermission::insert_many(links)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
