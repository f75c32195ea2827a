//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod employee;
mod permission;
mod role;
mod user;

pub use access::{
    ActionSpec, ColumnSpec, available_actions, can_create_employee, can_perform_action,
    can_view_employee_list, can_view_field, field_permission, visible_columns,
};
pub use employee::{Employee, EmployeeAction, EmployeeField, EmployeeId};
pub use permission::{
    ChartPermissions, DashboardPermissions, EmployeeManagementPermissions, FieldGrant,
    FieldPermission, GeneralDashboardPermissions, ListPermissions, OverviewCardPermissions,
    PermissionSet, RecentActivityPermissions, RoleManagementPermissions, SettingsPermissions,
    SystemManagementPermissions, UserManagementPermissions,
};
pub use role::{ADMINISTRATOR_ROLE, DEFAULT_ROLE_COLOR, Role, RoleId, RoleStatus};
pub use user::{EmailAddress, UserId};
