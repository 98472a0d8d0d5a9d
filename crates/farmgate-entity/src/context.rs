//! Request-scoped security context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::permission::Permission;

/// The resolved identity attached to a fully authorized request.
///
/// Built by the orchestrator only when every admission check passed, and
/// consumed by downstream business logic. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityContext {
    /// The authenticated user.
    pub user_id: Uuid,
    /// Role the request was admitted under.
    pub role: String,
    /// Permission set granted by the role.
    pub permissions: Vec<Permission>,
    /// Session the request rode in on, if any.
    pub session_id: Option<Uuid>,
    /// Client IP address, if known.
    pub ip_address: Option<std::net::IpAddr>,
    /// When the admission decision was made.
    pub request_time: DateTime<Utc>,
}

impl SecurityContext {
    /// Check whether the context carries a permission.
    pub fn has_permission(&self, permission: &Permission) -> bool {
        self.permissions.contains(permission)
    }
}
