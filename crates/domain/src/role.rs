//! Role records persisted with their permission documents.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use staffhub_core::AppError;
use uuid::Uuid;

use crate::permission::PermissionSet;

/// Role name granted full field-level access without consulting the
/// stored permission document. Exact, case-sensitive match.
pub const ADMINISTRATOR_ROLE: &str = "Administrator";

/// Color assigned to roles created without one.
pub const DEFAULT_ROLE_COLOR: &str = "#3B82F6";

/// Unique identifier for a role record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(Uuid);

impl RoleId {
    /// Creates a new random role identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a role identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Lifecycle status of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleStatus {
    /// Role may be assigned and evaluated.
    Active,
    /// Role is retained but no longer assignable.
    Inactive,
}

impl RoleStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl FromStr for RoleStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown role status '{value}'"
            ))),
        }
    }
}

/// One role record with its permission document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    /// Stable role identifier.
    pub id: RoleId,
    /// Unique role name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Capability document evaluated for users holding the role.
    pub permissions: PermissionSet,
    /// Display color.
    pub color: String,
    /// Lifecycle status.
    pub status: RoleStatus,
    /// Number of users currently holding the role, counted at read time.
    pub user_count: i64,
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::RoleStatus;

    #[test]
    fn status_round_trips_storage_value() {
        let restored = RoleStatus::from_str(RoleStatus::Active.as_str());
        assert!(restored.is_ok_and(|value| value == RoleStatus::Active));
    }

    #[test]
    fn status_match_is_case_sensitive() {
        assert!(RoleStatus::from_str("active").is_err());
    }
}
