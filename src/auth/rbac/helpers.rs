//! Effective authorization sets

use crate::core::models::UserRoleBinding;
use std::collections::BTreeSet;

/// Names of the roles granted through active bindings
pub fn effective_roles(bindings: &[UserRoleBinding]) -> BTreeSet<String> {
    bindings
        .iter()
        .filter(|binding| binding.is_active)
        .filter_map(|binding| binding.role.as_ref())
        .map(|role| role.name.clone())
        .collect()
}

/// `resource:action` keys granted through active bindings
pub fn effective_permissions(bindings: &[UserRoleBinding]) -> BTreeSet<String> {
    bindings
        .iter()
        .filter(|binding| binding.is_active)
        .filter_map(|binding| binding.role.as_ref())
        .flat_map(|role| role.permissions())
        .map(|permission| permission.key())
        .collect()
}
