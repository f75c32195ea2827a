use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use staffhub_application::{
    CategoryCount, DashboardSummary, EmployeeListing, OverviewCards, RecentActivity, ResolvedAuth,
};
use staffhub_core::UserIdentity;
use staffhub_domain::{ActionSpec, ColumnSpec, PermissionSet, Role};

/// Health response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Incoming login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize)]
pub struct UserIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub email: String,
    pub role: String,
}

impl From<UserIdentity> for UserIdentityResponse {
    fn from(value: UserIdentity) -> Self {
        Self {
            subject: value.subject().to_owned(),
            display_name: value.display_name().to_owned(),
            email: value.email().to_owned(),
            role: value.role().to_owned(),
        }
    }
}

/// Identity plus resolved permissions for the session.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject: String,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub permissions: Option<PermissionSet>,
    pub permissions_from_cache: bool,
}

impl MeResponse {
    pub fn from_identity_with_auth(identity: UserIdentity, auth: ResolvedAuth) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().to_owned(),
            role: identity.role().to_owned(),
            permissions: auth.permissions,
            permissions_from_cache: auth.from_cache,
        }
    }
}

/// Incoming payload for role creation.
#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: String,
    pub permissions: Value,
    pub color: Option<String>,
    pub status: Option<String>,
}

/// API representation of a role.
#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub permissions: PermissionSet,
    pub color: String,
    pub status: String,
    pub user_count: i64,
    pub created_at: String,
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            description: value.description,
            permissions: value.permissions,
            color: value.color,
            status: value.status.as_str().to_owned(),
            user_count: value.user_count,
            // Date-only; the time component is not part of the API surface.
            created_at: value.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// One visible employee-list column.
#[derive(Debug, Serialize)]
pub struct ColumnResponse {
    pub field: &'static str,
    pub label: &'static str,
}

impl From<ColumnSpec> for ColumnResponse {
    fn from(value: ColumnSpec) -> Self {
        Self {
            field: value.field.as_str(),
            label: value.label,
        }
    }
}

/// One available employee row action.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub action: &'static str,
    pub label: &'static str,
}

impl From<ActionSpec> for ActionResponse {
    fn from(value: ActionSpec) -> Self {
        Self {
            action: value.action.as_str(),
            label: value.label,
        }
    }
}

/// Employee list projected to the caller's grants.
#[derive(Debug, Serialize)]
pub struct EmployeeListingResponse {
    pub columns: Vec<ColumnResponse>,
    pub actions: Vec<ActionResponse>,
    pub employees: Vec<Map<String, Value>>,
}

impl From<EmployeeListing> for EmployeeListingResponse {
    fn from(value: EmployeeListing) -> Self {
        Self {
            columns: value.columns.into_iter().map(ColumnResponse::from).collect(),
            actions: value.actions.into_iter().map(ActionResponse::from).collect(),
            employees: value.employees,
        }
    }
}

/// Incoming payload for employee creation.
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub join_date: NaiveDate,
    pub gender: String,
    pub dob: NaiveDate,
    pub phone_no: String,
    pub position: String,
}

/// Incoming payload for employee updates: stored field values keyed by
/// field name.
#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub fields: BTreeMap<String, Value>,
}

/// One aggregate bucket.
#[derive(Debug, Serialize)]
pub struct CategoryCountResponse {
    pub category: String,
    pub count: i64,
}

impl From<CategoryCount> for CategoryCountResponse {
    fn from(value: CategoryCount) -> Self {
        Self {
            category: value.category,
            count: value.count,
        }
    }
}

/// Overview card values; ungranted cards are null.
#[derive(Debug, Serialize)]
pub struct OverviewCardsResponse {
    pub total_employees: Option<i64>,
    pub new_hires: Option<i64>,
    pub active_roles: Option<i64>,
}

impl From<OverviewCards> for OverviewCardsResponse {
    fn from(value: OverviewCards) -> Self {
        Self {
            total_employees: value.total_employees,
            new_hires: value.new_hires,
            active_roles: value.active_roles,
        }
    }
}

/// One recent-activity entry.
#[derive(Debug, Serialize)]
pub struct RecentActivityResponse {
    pub name: String,
    pub position: String,
    pub created_at: String,
}

impl From<RecentActivity> for RecentActivityResponse {
    fn from(value: RecentActivity) -> Self {
        Self {
            name: value.name,
            position: value.position,
            created_at: value.created_at,
        }
    }
}

/// Dashboard summary; ungranted sections are omitted.
#[derive(Debug, Serialize)]
pub struct DashboardSummaryResponse {
    pub can_view: bool,
    pub overview_cards: Option<OverviewCardsResponse>,
    pub gender_distribution: Option<Vec<CategoryCountResponse>>,
    pub position_distribution: Option<Vec<CategoryCountResponse>>,
    pub recent_activities: Option<Vec<RecentActivityResponse>>,
}

impl From<DashboardSummary> for DashboardSummaryResponse {
    fn from(value: DashboardSummary) -> Self {
        Self {
            can_view: value.can_view,
            overview_cards: value.overview_cards.map(OverviewCardsResponse::from),
            gender_distribution: value
                .gender_distribution
                .map(|counts| counts.into_iter().map(CategoryCountResponse::from).collect()),
            position_distribution: value
                .position_distribution
                .map(|counts| counts.into_iter().map(CategoryCountResponse::from).collect()),
            recent_activities: value
                .recent_activities
                .map(|entries| entries.into_iter().map(RecentActivityResponse::from).collect()),
        }
    }
}
