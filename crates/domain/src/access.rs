//! Pure permission evaluation over role permission documents.
//!
//! Every function here is total and side-effect-free: absent documents,
//! absent paths, and malformed entries all resolve to denial, never to an
//! error. `permissions` is `None` while no document has been resolved for
//! the caller yet.

use crate::employee::{EmployeeAction, EmployeeField};
use crate::permission::{FieldGrant, FieldPermission, PermissionSet};
use crate::role::ADMINISTRATOR_ROLE;

/// One employee-list column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Field backing the column.
    pub field: EmployeeField,
    /// Column header label.
    pub label: &'static str,
}

/// One employee row action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpec {
    /// Action behind the control.
    pub action: EmployeeAction,
    /// Control label.
    pub label: &'static str,
}

const EMPLOYEE_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec {
        field: EmployeeField::Name,
        label: "Name",
    },
    ColumnSpec {
        field: EmployeeField::JoinDate,
        label: "Join Date",
    },
    ColumnSpec {
        field: EmployeeField::ServiceYears,
        label: "Service Years",
    },
    ColumnSpec {
        field: EmployeeField::Gender,
        label: "Gender",
    },
    ColumnSpec {
        field: EmployeeField::Dob,
        label: "Date of Birth",
    },
    ColumnSpec {
        field: EmployeeField::PhoneNo,
        label: "Phone No",
    },
    ColumnSpec {
        field: EmployeeField::Position,
        label: "Position",
    },
];

const EMPLOYEE_ACTIONS: &[ActionSpec] = &[
    ActionSpec {
        action: EmployeeAction::View,
        label: "View",
    },
    ActionSpec {
        action: EmployeeAction::Edit,
        label: "Edit",
    },
    ActionSpec {
        action: EmployeeAction::Delete,
        label: "Delete",
    },
];

/// Returns whether the caller may see the given employee field.
#[must_use]
pub fn can_view_field(permissions: Option<&PermissionSet>, field: EmployeeField) -> bool {
    permissions
        .and_then(|set| set.employee_management.fields.get(field.as_str()))
        .is_some_and(|grant| grant.normalize().read)
}

/// Returns whether the caller may perform the given row action.
#[must_use]
pub fn can_perform_action(permissions: Option<&PermissionSet>, action: EmployeeAction) -> bool {
    permissions
        .and_then(|set| set.employee_management.actions.get(action.as_str()))
        .copied()
        .unwrap_or(false)
}

/// Returns whether the caller may open the employee list.
#[must_use]
pub fn can_view_employee_list(permissions: Option<&PermissionSet>) -> bool {
    permissions.is_some_and(|set| set.employee_management.list.view)
}

/// Returns whether the caller may create employee records.
#[must_use]
pub fn can_create_employee(permissions: Option<&PermissionSet>) -> bool {
    permissions.is_some_and(|set| set.employee_management.list.create)
}

/// Resolves the read/write pair for one employee field.
///
/// The Administrator role name short-circuits to full access without
/// consulting the stored document, including when no document is loaded.
#[must_use]
pub fn field_permission(
    permissions: Option<&PermissionSet>,
    user_role: &str,
    field: EmployeeField,
) -> FieldPermission {
    if user_role == ADMINISTRATOR_ROLE {
        return FieldPermission::full();
    }

    permissions
        .and_then(|set| set.employee_management.fields.get(field.as_str()))
        .map(FieldGrant::normalize)
        .unwrap_or_else(FieldPermission::none)
}

/// Returns the employee-list columns the caller may see.
///
/// Output order is the fixed declaration order; permissions only remove
/// entries, never reorder them.
#[must_use]
pub fn visible_columns(permissions: Option<&PermissionSet>) -> Vec<ColumnSpec> {
    EMPLOYEE_COLUMNS
        .iter()
        .copied()
        .filter(|column| can_view_field(permissions, column.field))
        .collect()
}

/// Returns the row actions the caller may take, in display order.
#[must_use]
pub fn available_actions(permissions: Option<&PermissionSet>) -> Vec<ActionSpec> {
    EMPLOYEE_ACTIONS
        .iter()
        .copied()
        .filter(|spec| can_perform_action(permissions, spec.action))
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use crate::employee::{EmployeeAction, EmployeeField};
    use crate::permission::{FieldPermission, PermissionSet};
    use crate::role::ADMINISTRATOR_ROLE;

    use super::{
        available_actions, can_perform_action, can_view_employee_list, can_view_field,
        field_permission, visible_columns,
    };

    fn document(value: serde_json::Value) -> PermissionSet {
        PermissionSet::from_value(&value)
    }

    #[test]
    fn absent_document_denies_every_field() {
        for field in EmployeeField::all() {
            assert!(!can_view_field(None, *field));
        }
    }

    #[test]
    fn missing_field_entry_denies_view() {
        let set = document(json!({
            "employeeManagement": { "fields": { "name": true } }
        }));

        assert!(can_view_field(Some(&set), EmployeeField::Name));
        assert!(!can_view_field(Some(&set), EmployeeField::Dob));
    }

    #[test]
    fn administrator_bypasses_stored_document() {
        let denied = document(json!({
            "employeeManagement": { "fields": { "name": { "read": false, "write": false } } }
        }));

        assert_eq!(
            field_permission(Some(&denied), ADMINISTRATOR_ROLE, EmployeeField::Name),
            FieldPermission::full()
        );
        assert_eq!(
            field_permission(None, ADMINISTRATOR_ROLE, EmployeeField::Dob),
            FieldPermission::full()
        );
    }

    #[test]
    fn administrator_match_is_exact() {
        assert_eq!(
            field_permission(None, "administrator", EmployeeField::Name),
            FieldPermission::none()
        );
    }

    #[test]
    fn visible_columns_preserve_declaration_order() {
        let set = document(json!({
            "employeeManagement": {
                "fields": { "position": true, "name": true }
            }
        }));

        let columns: Vec<_> = visible_columns(Some(&set))
            .into_iter()
            .map(|column| column.field)
            .collect();
        assert_eq!(columns, vec![EmployeeField::Name, EmployeeField::Position]);
    }

    #[test]
    fn structured_read_false_removes_column() {
        let set = document(json!({
            "employeeManagement": {
                "fields": {
                    "name": { "read": true, "write": true },
                    "gender": { "read": false, "write": true }
                }
            }
        }));

        let columns: Vec<_> = visible_columns(Some(&set))
            .into_iter()
            .map(|column| column.field)
            .collect();
        assert_eq!(columns, vec![EmployeeField::Name]);
    }

    #[test]
    fn employee_list_lookup_is_fail_closed() {
        assert!(!can_view_employee_list(None));

        let granted = document(json!({
            "employeeManagement": { "list": { "view": true } }
        }));
        assert!(can_view_employee_list(Some(&granted)));
    }

    #[test]
    fn actions_filter_keeps_display_order() {
        let set = document(json!({
            "employeeManagement": {
                "actions": { "delete": true, "view": true, "edit": false }
            }
        }));

        let actions: Vec<_> = available_actions(Some(&set))
            .into_iter()
            .map(|spec| spec.action)
            .collect();
        assert_eq!(actions, vec![EmployeeAction::View, EmployeeAction::Delete]);
    }

    proptest! {
        #[test]
        fn unknown_field_names_never_grant_access(key in "[a-zA-Z]{1,16}") {
            prop_assume!(
                EmployeeField::all()
                    .iter()
                    .all(|field| field.as_str() != key)
            );

            let set = document(json!({
                "employeeManagement": { "fields": { key: true } }
            }));

            for field in EmployeeField::all() {
                prop_assert!(!can_view_field(Some(&set), *field));
            }
        }

        #[test]
        fn legacy_grants_normalize_to_matching_pair(value: bool) {
            let set = document(json!({
                "employeeManagement": { "fields": { "phoneNo": value } }
            }));

            let resolved = field_permission(Some(&set), "HR", EmployeeField::PhoneNo);
            prop_assert_eq!(resolved, FieldPermission { read: value, write: value });
        }

        #[test]
        fn partial_structured_grants_default_missing_halves(read: bool) {
            let set = document(json!({
                "employeeManagement": { "fields": { "position": { "read": read } } }
            }));

            let resolved = field_permission(Some(&set), "HR", EmployeeField::Position);
            prop_assert_eq!(resolved, FieldPermission { read, write: false });
        }

        #[test]
        fn unknown_action_names_never_grant_access(key in "[a-zA-Z]{1,16}") {
            prop_assume!(
                EmployeeAction::all()
                    .iter()
                    .all(|action| action.as_str() != key)
            );

            let set = document(json!({
                "employeeManagement": { "actions": { key: true } }
            }));

            for action in EmployeeAction::all() {
                prop_assert!(!can_perform_action(Some(&set), *action));
            }
        }
    }
}
