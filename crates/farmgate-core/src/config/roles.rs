//! Role hierarchy and permission table configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Role tables: permission sets and hierarchy levels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Role name to hierarchy level. Higher levels subsume lower ones in
    /// hierarchy checks; roles absent from the map are level 0.
    #[serde(default = "default_hierarchy")]
    pub hierarchy: HashMap<String, i32>,
    /// Role name to permission strings. Every entry must have the shape
    /// `action:resource`.
    #[serde(default = "default_permissions")]
    pub permissions: HashMap<String, Vec<String>>,
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self {
            hierarchy: default_hierarchy(),
            permissions: default_permissions(),
        }
    }
}

fn default_hierarchy() -> HashMap<String, i32> {
    let mut map = HashMap::new();
    map.insert("user".to_string(), 1);
    map.insert("admin".to_string(), 2);
    map
}

fn default_permissions() -> HashMap<String, Vec<String>> {
    let user = vec![
        "read:customers",
        "write:customers",
        "delete:customers",
        "read:pens",
        "write:pens",
        "delete:pens",
        "read:feeds",
        "write:feeds",
        "delete:feeds",
        "read:dashboard",
    ];
    let admin = user
        .iter()
        .copied()
        .chain(["admin:users", "admin:apikeys", "admin:system"])
        .collect::<Vec<_>>();

    let mut map = HashMap::new();
    map.insert(
        "user".to_string(),
        user.into_iter().map(String::from).collect(),
    );
    map.insert(
        "admin".to_string(),
        admin.into_iter().map(String::from).collect(),
    );
    map
}
