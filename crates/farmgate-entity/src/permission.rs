//! Permission value object.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use farmgate_core::AppError;

/// A permission in `action:resource` form, e.g. `read:pens`.
///
/// The shape is validated on construction: exactly one separator with
/// non-empty text on both sides. Stored as the original string so
/// display and comparison stay cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Permission(String);

impl Permission {
    /// Parse and validate a permission string.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let mut parts = raw.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(action), Some(resource), None)
                if !action.trim().is_empty() && !resource.trim().is_empty() =>
            {
                Ok(Self(raw.to_string()))
            }
            _ => Err(AppError::validation(format!(
                "Invalid permission format '{raw}': expected 'action:resource'"
            ))),
        }
    }

    /// The action part (before the separator).
    pub fn action(&self) -> &str {
        self.0.split(':').next().unwrap_or_default()
    }

    /// The resource part (after the separator).
    pub fn resource(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or_default()
    }

    /// The full `action:resource` string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Permission {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.0
    }
}
