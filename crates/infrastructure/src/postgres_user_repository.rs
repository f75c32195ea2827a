use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use staffhub_application::{UserAccount, UserRepository};
use staffhub_core::{AppError, AppResult};
use staffhub_domain::UserId;

/// PostgreSQL-backed repository for login accounts.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: uuid::Uuid,
    email: String,
    display_name: String,
    password_hash: String,
    role_name: String,
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserAccount>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                users.id,
                users.email,
                users.display_name,
                users.password_hash,
                roles.name AS role_name
            FROM users
            INNER JOIN roles
                ON roles.id = users.role_id
            WHERE users.email = $1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to look up user: {error}")))?;

        Ok(row.map(|row| UserAccount {
            id: UserId::from_uuid(row.id),
            email: row.email,
            display_name: row.display_name,
            role_name: row.role_name,
            password_hash: row.password_hash,
        }))
    }
}
