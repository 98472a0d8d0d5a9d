//! Permission and role-hierarchy enforcement.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use farmgate_entity::Permission;

use super::table::RoleTable;

/// Outcome of a permission check.
#[derive(Debug, Clone)]
pub struct AuthzOutcome {
    /// Whether the required permission is in the role's set.
    pub granted: bool,
    /// Stable denial code, set when not granted.
    pub code: Option<&'static str>,
    /// Human-readable denial detail, set when not granted.
    pub message: Option<String>,
    /// The role's full permission set.
    pub permissions: Vec<Permission>,
    /// The role's hierarchy level.
    pub role_level: i32,
}

/// Evaluates permission checks against an immutable [`RoleTable`].
#[derive(Debug, Clone)]
pub struct RbacEnforcer {
    /// Role table snapshot.
    table: Arc<RoleTable>,
}

impl RbacEnforcer {
    /// Creates an enforcer over a role table snapshot.
    pub fn new(table: Arc<RoleTable>) -> Self {
        Self { table }
    }

    /// Check whether `role` carries `permission`.
    pub fn check_permission(
        &self,
        user_id: Uuid,
        role: &str,
        permission: &Permission,
    ) -> AuthzOutcome {
        let granted = self.table.grants(role, permission);

        if granted {
            debug!(user_id = %user_id, role, permission = %permission, "Authorization granted");
        } else {
            warn!(
                user_id = %user_id,
                role,
                permission = %permission,
                "Authorization denied, permission missing"
            );
        }

        AuthzOutcome {
            granted,
            code: (!granted).then_some("INSUFFICIENT_PERMISSIONS"),
            message: (!granted)
                .then(|| format!("Role '{role}' does not have permission '{permission}'")),
            permissions: self.table.permissions_for(role).to_vec(),
            role_level: self.table.level_for(role),
        }
    }

    /// Whether `user_role` sits at or above `required_role`.
    pub fn check_role_hierarchy(&self, user_role: &str, required_role: &str) -> bool {
        self.table.level_for(user_role) >= self.table.level_for(required_role)
    }

    /// Whether the role carries at least one of the permissions.
    pub fn has_any(&self, role: &str, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.table.grants(role, p))
    }

    /// Whether the role carries every one of the permissions.
    pub fn has_all(&self, role: &str, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.table.grants(role, p))
    }

    /// The role's full permission set.
    pub fn permissions_for(&self, role: &str) -> &[Permission] {
        self.table.permissions_for(role)
    }
}
