use catalog_core::{AppError, AppResult, Principal};
use catalog_domain::Permission;

/// Permission condition a route requires from the principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionRequirement {
    /// The principal must hold this permission.
    Hold(Permission),
    /// The principal must hold at least one of these permissions.
    AnyOf(Vec<Permission>),
}

impl PermissionRequirement {
    /// Requires a single permission.
    #[must_use]
    pub fn hold(permission: Permission) -> Self {
        Self::Hold(permission)
    }

    /// Requires at least one permission of the list.
    #[must_use]
    pub fn any_of(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self::AnyOf(permissions.into_iter().collect())
    }

    /// Returns the permissions named by the requirement.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        match self {
            Self::Hold(permission) => std::slice::from_ref(permission),
            Self::AnyOf(permissions) => permissions.as_slice(),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Hold(permission) => format!("permission '{}' is required", permission.as_str()),
            Self::AnyOf(permissions) => {
                let names = permissions
                    .iter()
                    .map(Permission::as_str)
                    .collect::<Vec<_>>();
                format!("one of [{}] is required", names.join(", "))
            }
        }
    }
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    /// The request may continue.
    Allow,
    /// The request must stop.
    Deny,
}

impl PolicyDecision {
    /// Converts a denial into a forbidden error describing the requirement.
    pub fn into_result(self, requirement: &PermissionRequirement) -> AppResult<()> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny => Err(AppError::Forbidden(format!(
                "permission denied: {}",
                requirement.describe()
            ))),
        }
    }
}

/// Evaluates a requirement against the principal's permission set.
#[must_use]
pub fn authorize(principal: &Principal, requirement: &PermissionRequirement) -> PolicyDecision {
    let allowed = requirement
        .permissions()
        .iter()
        .any(|permission| principal.has_permission(permission.as_str()));

    if allowed {
        PolicyDecision::Allow
    } else {
        PolicyDecision::Deny
    }
}
