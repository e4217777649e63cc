//! Declared access requirements

/// What a caller must hold to reach an operation
///
/// Roles are alternatives (any one suffices); permissions are all required.
/// When both are declared both must pass. An owner parameter switches the
/// requirement to the owner-or-admin rule instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRequirement {
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    /// Path parameter holding the id of the resource owner
    pub owner_param: Option<String>,
}

impl AccessRequirement {
    /// No requirement; identity is optional
    pub fn none() -> Self {
        Self::default()
    }

    pub fn any_role<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn all_permissions<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Add required permissions on top of the current requirement
    pub fn and_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions
            .extend(permissions.into_iter().map(Into::into));
        self
    }

    /// Admins, or the user whose id is in the given path parameter
    pub fn owner_or_admin(param: impl Into<String>) -> Self {
        Self {
            owner_param: Some(param.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.permissions.is_empty() && self.owner_param.is_none()
    }
}
