//! Employee records and the fixed field and action catalogs.

use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use staffhub_core::AppError;
use uuid::Uuid;

/// Unique identifier for an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(Uuid);

impl EmployeeId {
    /// Creates a new random employee identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an employee identifier from an existing UUID value.
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

impl Default for EmployeeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Fields of an employee record subject to per-field permission checks.
///
/// The declaration order is the fixed column order of the employee list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EmployeeField {
    /// Full name.
    Name,
    /// Date the employee joined.
    JoinDate,
    /// Completed years of service, derived from the join date.
    ServiceYears,
    /// Gender.
    Gender,
    /// Date of birth.
    Dob,
    /// Phone number.
    PhoneNo,
    /// Job position.
    Position,
}

impl EmployeeField {
    /// Returns the stable storage key for this field.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::JoinDate => "joinDate",
            Self::ServiceYears => "serviceYears",
            Self::Gender => "gender",
            Self::Dob => "dob",
            Self::PhoneNo => "phoneNo",
            Self::Position => "position",
        }
    }

    /// Returns all fields in column order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[EmployeeField] = &[
            EmployeeField::Name,
            EmployeeField::JoinDate,
            EmployeeField::ServiceYears,
            EmployeeField::Gender,
            EmployeeField::Dob,
            EmployeeField::PhoneNo,
            EmployeeField::Position,
        ];

        ALL
    }

    /// Returns whether the field holds a stored value.
    ///
    /// `serviceYears` is derived from the join date at read time and can
    /// never be written.
    #[must_use]
    pub fn is_stored(&self) -> bool {
        !matches!(self, Self::ServiceYears)
    }
}

impl FromStr for EmployeeField {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "name" => Ok(Self::Name),
            "joinDate" => Ok(Self::JoinDate),
            "serviceYears" => Ok(Self::ServiceYears),
            "gender" => Ok(Self::Gender),
            "dob" => Ok(Self::Dob),
            "phoneNo" => Ok(Self::PhoneNo),
            "position" => Ok(Self::Position),
            _ => Err(AppError::Validation(format!(
                "unknown employee field '{value}'"
            ))),
        }
    }
}

/// Row actions available on the employee list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeAction {
    /// Open one record.
    View,
    /// Change one record.
    Edit,
    /// Remove one record.
    Delete,
}

impl EmployeeAction {
    /// Returns the stable storage key for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }

    /// Returns all actions in display order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[EmployeeAction] = &[
            EmployeeAction::View,
            EmployeeAction::Edit,
            EmployeeAction::Delete,
        ];

        ALL
    }
}

impl FromStr for EmployeeAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "view" => Ok(Self::View),
            "edit" => Ok(Self::Edit),
            "delete" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown employee action '{value}'"
            ))),
        }
    }
}

/// One employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Stable record identifier.
    pub id: EmployeeId,
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
    /// Record creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Employee {
    /// Completed years of service as of the given date.
    ///
    /// Never negative; a join date in the future counts as zero.
    #[must_use]
    pub fn service_years(&self, today: NaiveDate) -> i32 {
        let mut years = today.year() - self.join_date.year();
        if (today.month(), today.day()) < (self.join_date.month(), self.join_date.day()) {
            years -= 1;
        }

        years.max(0)
    }
}
