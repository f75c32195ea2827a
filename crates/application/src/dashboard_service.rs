use std::sync::Arc;

use chrono::Days;
use staffhub_core::{AppResult, UserIdentity};

use crate::access_service::AccessService;
use crate::employee_ports::{CategoryCount, EmployeeRepository};
use crate::permission_cache::Clock;
use crate::role_ports::RoleRepository;

const NEW_HIRE_WINDOW_DAYS: u64 = 30;
const RECENT_ACTIVITY_LIMIT: i64 = 5;

/// Overview card values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverviewCards {
    /// Total headcount, when granted.
    pub total_employees: Option<i64>,
    /// Employees joined within the last 30 days, when granted.
    pub new_hires: Option<i64>,
    /// Active role count, when granted.
    pub active_roles: Option<i64>,
}

/// One recent-activity feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentActivity {
    /// Employee name.
    pub name: String,
    /// Employee position.
    pub position: String,
    /// Record creation timestamp, RFC 3339.
    pub created_at: String,
}

/// Dashboard sections the caller is allowed to see. Sections without the
/// matching grant are omitted rather than errored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    /// Dashboard page access.
    pub can_view: bool,
    /// Overview card row, when any card is granted.
    pub overview_cards: Option<OverviewCards>,
    /// Gender distribution chart data, when granted.
    pub gender_distribution: Option<Vec<CategoryCount>>,
    /// Position distribution chart data, when granted.
    pub position_distribution: Option<Vec<CategoryCount>>,
    /// Recent-activity feed, when granted.
    pub recent_activities: Option<Vec<RecentActivity>>,
}

/// Application service assembling the dashboard summary.
#[derive(Clone)]
pub struct DashboardService {
    employees: Arc<dyn EmployeeRepository>,
    roles: Arc<dyn RoleRepository>,
    access: AccessService,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    /// Creates a dashboard service.
    #[must_use]
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        roles: Arc<dyn RoleRepository>,
        access: AccessService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            employees,
            roles,
            access,
            clock,
        }
    }

    /// Assembles the sections the caller's permissions grant.
    ///
    /// A caller with no dashboard grant receives an empty summary, not
    /// an error; widget data is only queried when its flag is set.
    pub async fn summary(&self, actor: &UserIdentity) -> AppResult<DashboardSummary> {
        let auth = self.access.resolve_for(actor).await;
        let Some(permissions) = auth.permissions else {
            return Ok(DashboardSummary::default());
        };

        let dashboard = &permissions.dashboard;
        let mut summary = DashboardSummary {
            can_view: dashboard.general.view,
            ..DashboardSummary::default()
        };

        let cards = &dashboard.overview_cards;
        if cards.view_total_employees || cards.view_new_hires || cards.view_active_roles {
            let mut overview = OverviewCards::default();

            if cards.view_total_employees {
                overview.total_employees = Some(self.employees.count_employees().await?);
            }
            if cards.view_new_hires {
                let today = self.clock.now().date_naive();
                let window_start = today
                    .checked_sub_days(Days::new(NEW_HIRE_WINDOW_DAYS))
                    .unwrap_or(today);
                overview.new_hires = Some(self.employees.count_joined_since(window_start).await?);
            }
            if cards.view_active_roles {
                overview.active_roles = Some(self.roles.count_active().await?);
            }

            summary.overview_cards = Some(overview);
        }

        if dashboard.charts.view_gender_distribution {
            summary.gender_distribution = Some(self.employees.gender_distribution().await?);
        }
        if dashboard.charts.view_position_distribution {
            summary.position_distribution = Some(self.employees.position_distribution().await?);
        }

        if dashboard.recent_activities.view_recent_activities {
            let recent = self
                .employees
                .list_recent(RECENT_ACTIVITY_LIMIT)
                .await?
                .into_iter()
                .map(|employee| RecentActivity {
                    name: employee.name,
                    position: employee.position,
                    created_at: employee.created_at.to_rfc3339(),
                })
                .collect();
            summary.recent_activities = Some(recent);
        }

        Ok(summary)
    }
}
