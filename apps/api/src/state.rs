use staffhub_application::{
    AccessService, DashboardService, EmployeeService, RoleService, UserService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub employee_service: EmployeeService,
    pub role_service: RoleService,
    pub dashboard_service: DashboardService,
    pub access_service: AccessService,
    pub frontend_url: String,
}
