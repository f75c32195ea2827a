use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};

use staffhub_application::{CategoryCount, EmployeeRepository};
use staffhub_core::{AppError, AppResult};
use staffhub_domain::{Employee, EmployeeId};

/// PostgreSQL-backed repository for employee records.
#[derive(Clone)]
pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct EmployeeRow {
    id: uuid::Uuid,
    name: String,
    join_date: NaiveDate,
    gender: String,
    dob: NaiveDate,
    phone_no: String,
    position: String,
    created_at: DateTime<Utc>,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        Self {
            id: EmployeeId::from_uuid(row.id),
            name: row.name,
            join_date: row.join_date,
            gender: row.gender,
            dob: row.dob,
            phone_no: row.phone_no,
            position: row.position,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CategoryCountRow {
    category: String,
    count: i64,
}

const EMPLOYEE_COLUMNS_SQL: &str =
    "id, name, join_date, gender, dob, phone_no, position, created_at";

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS_SQL} FROM employees ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list employees: {error}")))?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn find_employee(&self, id: EmployeeId) -> AppResult<Option<Employee>> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS_SQL} FROM employees WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load employee: {error}")))?;

        Ok(row.map(Employee::from))
    }

    async fn insert_employee(&self, employee: &Employee) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO employees (id, name, join_date, gender, dob, phone_no, position, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(employee.id.as_uuid())
        .bind(employee.name.as_str())
        .bind(employee.join_date)
        .bind(employee.gender.as_str())
        .bind(employee.dob)
        .bind(employee.phone_no.as_str())
        .bind(employee.position.as_str())
        .bind(employee.created_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert employee: {error}")))?;

        Ok(())
    }

    async fn update_employee(&self, employee: &Employee) -> AppResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE employees
            SET name = $2, join_date = $3, gender = $4, dob = $5, phone_no = $6, position = $7
            WHERE id = $1
            "#,
        )
        .bind(employee.id.as_uuid())
        .bind(employee.name.as_str())
        .bind(employee.join_date)
        .bind(employee.gender.as_str())
        .bind(employee.dob)
        .bind(employee.phone_no.as_str())
        .bind(employee.position.as_str())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update employee: {error}")))?
        .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound(format!(
                "employee '{}' was not found",
                employee.id
            )));
        }

        Ok(())
    }

    async fn delete_employee(&self, id: EmployeeId) -> AppResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to delete employee: {error}")))?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn count_employees(&self) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count employees: {error}")))
    }

    async fn count_joined_since(&self, date: NaiveDate) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE join_date >= $1")
            .bind(date)
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count new hires: {error}")))
    }

    async fn gender_distribution(&self) -> AppResult<Vec<CategoryCount>> {
        aggregate_by(&self.pool, "gender").await
    }

    async fn position_distribution(&self) -> AppResult<Vec<CategoryCount>> {
        aggregate_by(&self.pool, "position").await
    }

    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS_SQL} FROM employees ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list recent employees: {error}")))?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }
}

async fn aggregate_by(pool: &PgPool, column: &str) -> AppResult<Vec<CategoryCount>> {
    // `column` is one of two fixed identifiers, never caller input.
    let rows = sqlx::query_as::<_, CategoryCountRow>(&format!(
        "SELECT {column} AS category, COUNT(*) AS count \
         FROM employees GROUP BY {column} ORDER BY count DESC, category"
    ))
    .fetch_all(pool)
    .await
    .map_err(|error| {
        AppError::Internal(format!("failed to aggregate employees by {column}: {error}"))
    })?;

    Ok(rows
        .into_iter()
        .map(|row| CategoryCount {
            category: row.category,
            count: row.count,
        })
        .collect())
}
