//! Application services and ports.

#![forbid(unsafe_code)]

mod access_service;
mod dashboard_service;
mod employee_ports;
mod employee_service;
mod permission_cache;
mod role_ports;
mod role_service;
#[cfg(test)]
mod test_support;
mod user_ports;
mod user_service;

pub use access_service::AccessService;
pub use dashboard_service::{DashboardService, DashboardSummary, OverviewCards, RecentActivity};
pub use employee_ports::{CategoryCount, CreateEmployeeInput, EmployeeRepository};
pub use employee_service::{EmployeeListing, EmployeeService, UpdateEmployeeInput};
pub use permission_cache::{
    AuthState, CachedPermissionSnapshot, Clock, KeyValueStore, PERMISSION_CACHE_KEY,
    PERMISSION_CACHE_TTL_MILLIS, PermissionCache, ResolvedAuth,
};
pub use role_ports::{NewRole, RolePermissionDocument, RoleRepository};
pub use role_service::{CreateRoleInput, RoleService};
pub use user_ports::{PasswordHasher, UserAccount, UserRepository};
pub use user_service::{AuthOutcome, UserService};
