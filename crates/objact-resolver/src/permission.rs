//! Permission checker implementations.

use objact_core::{PermissionChecker, User};

/// Checks the permissions carried on the [`User`] itself.
///
/// Superusers hold every permission and inactive users hold none, the
/// usual console convention.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserPermissions;

impl PermissionChecker for UserPermissions {
    fn has_permission(&self, user: &User, permission: &str) -> bool {
        if !user.is_active {
            return false;
        }
        user.is_superuser || user.permissions.contains(permission)
    }
}

/// Grants everything. For tests and trusted tooling only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PermissionChecker for AllowAll {
    fn has_permission(&self, _user: &User, permission: &str) -> bool {
        tracing::trace!(permission = %permission, "allow-all permission check");
        true
    }
}
