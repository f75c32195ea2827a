use async_trait::async_trait;
use chrono::NaiveDate;
use staffhub_core::AppResult;
use staffhub_domain::{Employee, EmployeeId};

/// Incoming payload for employee creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEmployeeInput {
    /// Full name.
    pub name: String,
    /// Date the employee joined.
    pub join_date: NaiveDate,
    /// Gender.
    pub gender: String,
    /// Date of birth.
    pub dob: NaiveDate,
    /// Phone number.
    pub phone_no: String,
    /// Job position.
    pub position: String,
}

/// One category bucket of an aggregate count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCount {
    /// Bucket label, e.g. a gender or position value.
    pub category: String,
    /// Number of records in the bucket.
    pub count: i64,
}

/// Repository port for employee records.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Lists all employees ordered by creation time, newest first.
    async fn list_employees(&self) -> AppResult<Vec<Employee>>;

    /// Finds one employee by identifier.
    async fn find_employee(&self, id: EmployeeId) -> AppResult<Option<Employee>>;

    /// Persists a new employee record.
    async fn insert_employee(&self, employee: &Employee) -> AppResult<()>;

    /// Replaces the stored fields of an existing employee record.
    async fn update_employee(&self, employee: &Employee) -> AppResult<()>;

    /// Deletes one employee record; returns whether a record existed.
    async fn delete_employee(&self, id: EmployeeId) -> AppResult<bool>;

    /// Counts all employee records.
    async fn count_employees(&self) -> AppResult<i64>;

    /// Counts employees who joined on or after the given date.
    async fn count_joined_since(&self, date: NaiveDate) -> AppResult<i64>;

    /// Aggregates employee counts by gender.
    async fn gender_distribution(&self) -> AppResult<Vec<CategoryCount>>;

    /// Aggregates employee counts by position.
    async fn position_distribution(&self) -> AppResult<Vec<CategoryCount>>;

    /// Lists the most recently created employees.
    async fn list_recent(&self, limit: i64) -> AppResult<Vec<Employee>>;
}
