use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};

use staffhub_application::{NewRole, RolePermissionDocument, RoleRepository};
use staffhub_core::{AppError, AppResult};
use staffhub_domain::{PermissionSet, Role, RoleId, RoleStatus};

/// PostgreSQL-backed repository for role records.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: uuid::Uuid,
    name: String,
    description: String,
    permissions: Value,
    color: String,
    status: String,
    user_count: i64,
    created_at: DateTime<Utc>,
}

impl RoleRow {
    fn into_role(self) -> AppResult<Role> {
        let status = RoleStatus::from_str(self.status.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "invalid stored status for role '{}': {error}",
                self.name
            ))
        })?;

        Ok(Role {
            id: RoleId::from_uuid(self.id),
            name: self.name,
            description: self.description,
            permissions: PermissionSet::from_value(&self.permissions),
            color: self.color,
            status,
            user_count: self.user_count,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct PermissionDocumentRow {
    id: uuid::Uuid,
    permissions: Value,
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT
                roles.id,
                roles.name,
                roles.description,
                roles.permissions,
                roles.color,
                roles.status,
                (
                    SELECT COUNT(*)
                    FROM users
                    WHERE users.role_id = roles.id
                ) AS user_count,
                roles.created_at
            FROM roles
            ORDER BY roles.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        rows.into_iter().map(RoleRow::into_role).collect()
    }

    async fn create_role(&self, role: NewRole) -> AppResult<Role> {
        let role_id = RoleId::new();

        let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            INSERT INTO roles (id, name, description, permissions, color, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING created_at
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(role.name.as_str())
        .bind(role.description.as_str())
        .bind(&role.permissions)
        .bind(role.color.as_str())
        .bind(role.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| map_role_conflict(error, role.name.as_str()))?;

        Ok(Role {
            id: role_id,
            name: role.name,
            description: role.description,
            permissions: PermissionSet::from_value(&role.permissions),
            color: role.color,
            status: role.status,
            user_count: 0,
            created_at,
        })
    }

    async fn find_permissions_by_name(&self, name: &str) -> AppResult<Option<PermissionSet>> {
        let document = sqlx::query_scalar::<_, Value>(
            r#"
            SELECT permissions
            FROM roles
            WHERE name = $1
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to resolve role permissions: {error}"))
        })?;

        Ok(document
            .as_ref()
            .map(PermissionSet::from_value))
    }

    async fn count_active(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM roles
            WHERE status = $1
            "#,
        )
        .bind(RoleStatus::Active.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count active roles: {error}")))
    }

    async fn list_permission_documents(&self) -> AppResult<Vec<RolePermissionDocument>> {
        let rows = sqlx::query_as::<_, PermissionDocumentRow>(
            r#"
            SELECT id, permissions
            FROM roles
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list permission documents: {error}"))
        })?;

        Ok(rows
            .into_iter()
            .map(|row| RolePermissionDocument {
                role_id: RoleId::from_uuid(row.id),
                permissions: row.permissions,
            })
            .collect())
    }

    async fn save_permission_document(
        &self,
        role_id: RoleId,
        permissions: &Value,
    ) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE roles
            SET permissions = $2
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permissions)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to save permission document: {error}"))
        })?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "role '{role_id}' was not found"
            )));
        }

        Ok(())
    }
}

fn map_role_conflict(error: sqlx::Error, role_name: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("role '{role_name}' already exists"));
    }

    AppError::Internal(format!("failed to create role: {error}"))
}
