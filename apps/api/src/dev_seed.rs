//! Development-only seed data: the built-in roles and an admin account.

use serde_json::json;
use sqlx::PgPool;
use staffhub_application::PasswordHasher;
use staffhub_core::{AppError, AppResult};
use staffhub_domain::{ADMINISTRATOR_ROLE, PermissionSet, RoleStatus};
use staffhub_infrastructure::Argon2PasswordHasher;
use tracing::info;
use uuid::Uuid;

const SEED_ADMIN_ROLE_ID: &str = "5d3f7f0a-10b6-4a38-8cde-6a4f4a3f9f01";
const SEED_HR_ROLE_ID: &str = "5d3f7f0a-10b6-4a38-8cde-6a4f4a3f9f02";
const SEED_ADMIN_USER_ID: &str = "9b7a2c44-52c5-4f6e-b1d7-62a3c0f8ab10";

pub async fn run(pool: &PgPool, admin_email: &str, admin_password: &str) -> AppResult<()> {
    let admin_role_id = parse_uuid_const(SEED_ADMIN_ROLE_ID, "SEED_ADMIN_ROLE_ID")?;
    let hr_role_id = parse_uuid_const(SEED_HR_ROLE_ID, "SEED_HR_ROLE_ID")?;
    let admin_user_id = parse_uuid_const(SEED_ADMIN_USER_ID, "SEED_ADMIN_USER_ID")?;

    let admin_permissions = serde_json::to_value(PermissionSet::full_access())
        .map_err(|error| AppError::Internal(format!("failed to encode seed permissions: {error}")))?;

    ensure_role(
        pool,
        admin_role_id,
        ADMINISTRATOR_ROLE,
        "Full access to every module",
        &admin_permissions,
        "#EF4444",
    )
    .await?;

    // Mixed-format document: `name` keeps the legacy boolean shape the
    // evaluator must tolerate alongside structured entries.
    let hr_permissions = json!({
        "dashboard": {
            "general": { "view": true },
            "overviewCards": { "viewTotalEmployees": true, "viewNewHires": true },
            "recentActivities": { "viewRecentActivities": true }
        },
        "employeeManagement": {
            "fields": {
                "name": true,
                "joinDate": { "read": true, "write": true },
                "serviceYears": { "read": true },
                "gender": { "read": true },
                "position": { "read": true, "write": true }
            },
            "actions": { "view": true, "edit": true },
            "list": { "view": true, "create": true }
        }
    });

    ensure_role(
        pool,
        hr_role_id,
        "HR Officer",
        "Day-to-day employee administration",
        &hr_permissions,
        "#3B82F6",
    )
    .await?;

    let password_hash = Argon2PasswordHasher::new().hash_password(admin_password)?;

    sqlx::query(
        r#"
        INSERT INTO users (id, email, display_name, password_hash, role_id)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO NOTHING
        "#,
    )
    .bind(admin_user_id)
    .bind(admin_email)
    .bind("Administrator")
    .bind(password_hash)
    .bind(admin_role_id)
    .execute(pool)
    .await
    .map_err(|error| AppError::Internal(format!("failed to seed admin user: {error}")))?;

    info!(admin_email, "development seed data ensured");
    Ok(())
}

async fn ensure_role(
    pool: &PgPool,
    role_id: Uuid,
    name: &str,
    description: &str,
    permissions: &serde_json::Value,
    color: &str,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO roles (id, name, description, permissions, color, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (name) DO NOTHING
        "#,
    )
    .bind(role_id)
    .bind(name)
    .bind(description)
    .bind(permissions)
    .bind(color)
    .bind(RoleStatus::Active.as_str())
    .execute(pool)
    .await
    .map_err(|error| AppError::Internal(format!("failed to seed role '{name}': {error}")))?;

    Ok(())
}

fn parse_uuid_const(value: &str, name: &str) -> AppResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|error| AppError::Internal(format!("invalid {name} constant: {error}")))
}
