use async_trait::async_trait;
use serde_json::Value;
use staffhub_core::AppResult;
use staffhub_domain::{PermissionSet, Role, RoleId, RoleStatus};

/// Finalized payload for persisting a new role.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRole {
    /// Unique role name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Permission document, stored as given.
    pub permissions: Value,
    /// Display color.
    pub color: String,
    /// Lifecycle status.
    pub status: RoleStatus,
}

/// Raw permission document of one stored role.
#[derive(Debug, Clone, PartialEq)]
pub struct RolePermissionDocument {
    /// Stable role identifier.
    pub role_id: RoleId,
    /// Stored document, exactly as persisted.
    pub permissions: Value,
}

/// Repository port for role records.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists all roles ordered by creation time, newest first, with the
    /// user count taken from a live relational count.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Persists a new role; fails with a conflict when the name exists.
    async fn create_role(&self, role: NewRole) -> AppResult<Role>;

    /// Resolves the permission document of the named role, if present.
    async fn find_permissions_by_name(&self, name: &str) -> AppResult<Option<PermissionSet>>;

    /// Counts roles whose status is active.
    async fn count_active(&self) -> AppResult<i64>;

    /// Returns every stored permission document for maintenance rewrites.
    async fn list_permission_documents(&self) -> AppResult<Vec<RolePermissionDocument>>;

    /// Replaces one role's stored permission document.
    async fn save_permission_document(&self, role_id: RoleId, permissions: &Value)
    -> AppResult<()>;
}
