//! Immutable role table: permission sets and hierarchy levels.

use std::collections::HashMap;

use farmgate_core::config::roles::RoleConfig;
use farmgate_core::{AppError, AppResult};
use farmgate_entity::Permission;

/// Role tables loaded from configuration at startup.
///
/// Immutable for the table's lifetime; enforcement is a pure read. A new
/// configuration means building a new table and swapping the handle.
#[derive(Debug, Clone)]
pub struct RoleTable {
    /// Role name → permission set, in configuration order.
    permissions: HashMap<String, Vec<Permission>>,
    /// Role name → hierarchy level.
    hierarchy: HashMap<String, i32>,
}

impl RoleTable {
    /// Build a role table, validating every permission string.
    ///
    /// A single malformed entry rejects the whole table so a typo in
    /// configuration surfaces at startup instead of as a silent denial.
    pub fn from_config(config: &RoleConfig) -> AppResult<Self> {
        let mut permissions = HashMap::with_capacity(config.permissions.len());

        for (role, raw_permissions) in &config.permissions {
            let mut parsed = Vec::with_capacity(raw_permissions.len());
            for raw in raw_permissions {
                let permission = Permission::parse(raw).map_err(|e| {
                    AppError::configuration(format!(
                        "Bad permission entry for role '{role}': {}",
                        e.message
                    ))
                })?;
                parsed.push(permission);
            }
            permissions.insert(role.clone(), parsed);
        }

        Ok(Self {
            permissions,
            hierarchy: config.hierarchy.clone(),
        })
    }

    /// The permission set of a role. Unknown roles have no permissions.
    pub fn permissions_for(&self, role: &str) -> &[Permission] {
        self.permissions
            .get(role)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The hierarchy level of a role. Unknown roles are level 0.
    pub fn level_for(&self, role: &str) -> i32 {
        self.hierarchy.get(role).copied().unwrap_or(0)
    }

    /// Whether the role's set contains the permission.
    pub fn grants(&self, role: &str, permission: &Permission) -> bool {
        self.permissions_for(role).contains(permission)
    }
}
