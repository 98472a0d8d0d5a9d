//! User entity model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user as seen by the security pipeline.
///
/// Users live in the external store; this is the read-only projection
/// the pipeline needs to admit or deny a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Display name, used in log lines only.
    pub name: String,
    /// The user's role.
    pub role: String,
    /// Whether the account is active. Inactive users fail validation
    /// even with a valid key.
    pub is_active: bool,
}
