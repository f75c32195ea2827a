//! Role permission documents.
//!
//! A permission document is a nested JSON tree persisted per role. Decoding
//! is fail-closed at every node: a missing or wrong-typed node decodes to
//! that node's all-false default instead of failing the whole document.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::employee::{EmployeeAction, EmployeeField};

/// Read/write access resolved for one employee field.
///
/// The flags are independent in storage: `write` does not imply `read`.
/// Callers check `read` for visibility and `write` for editability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPermission {
    /// Field value may be shown to the caller.
    pub read: bool,
    /// Field value may be changed by the caller.
    pub write: bool,
}

impl FieldPermission {
    /// Grants both read and write.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            read: true,
            write: true,
        }
    }

    /// Denies both read and write.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            read: false,
            write: false,
        }
    }
}

/// One stored field entry.
///
/// Roles persisted before the structured schema hold a bare boolean under
/// the field key. Both shapes coexist indefinitely and round-trip
/// unchanged; `normalize` resolves either into a [`FieldPermission`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldGrant {
    /// Pre-migration shape: a single flag covering read and write.
    Legacy(bool),
    /// Structured shape with independent read and write flags.
    Structured {
        /// Field value may be shown; absent halves default to denied.
        #[serde(default)]
        read: bool,
        /// Field value may be changed; absent halves default to denied.
        #[serde(default)]
        write: bool,
    },
    /// Any other stored shape; resolves to no access.
    Malformed(Value),
}

impl FieldGrant {
    /// Resolves either stored shape into a read/write pair.
    #[must_use]
    pub fn normalize(&self) -> FieldPermission {
        match self {
            Self::Legacy(value) => FieldPermission {
                read: *value,
                write: *value,
            },
            Self::Structured { read, write } => FieldPermission {
                read: *read,
                write: *write,
            },
            Self::Malformed(_) => FieldPermission::none(),
        }
    }
}

/// Capability tree persisted for one role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    /// Dashboard widget visibility.
    #[serde(default, deserialize_with = "lenient")]
    pub dashboard: DashboardPermissions,
    /// Employee record capabilities.
    #[serde(default, deserialize_with = "lenient")]
    pub employee_management: EmployeeManagementPermissions,
    /// User account capabilities.
    #[serde(default, deserialize_with = "lenient")]
    pub user_management: UserManagementPermissions,
    /// Role and settings administration capabilities.
    #[serde(default, deserialize_with = "lenient")]
    pub system_management: SystemManagementPermissions,
}

impl PermissionSet {
    /// Decodes a stored permission document.
    ///
    /// Never fails: a document that is not a JSON object decodes to the
    /// all-false default, and malformed interior nodes decode to their
    /// own defaults.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// Builds a document granting every capability.
    ///
    /// Used when seeding the built-in Administrator role.
    #[must_use]
    pub fn full_access() -> Self {
        let fields = EmployeeField::all()
            .iter()
            .map(|field| {
                (
                    field.as_str().to_owned(),
                    FieldGrant::Structured {
                        read: true,
                        write: true,
                    },
                )
            })
            .collect();
        let employee_actions = EmployeeAction::all()
            .iter()
            .map(|action| (action.as_str().to_owned(), true))
            .collect();
        let user_actions = ["view", "create", "edit", "delete"]
            .into_iter()
            .map(|action| (action.to_owned(), true))
            .collect();

        Self {
            dashboard: DashboardPermissions::full_access(),
            employee_management: EmployeeManagementPermissions {
                fields,
                actions: employee_actions,
                list: ListPermissions {
                    view: true,
                    create: true,
                },
            },
            user_management: UserManagementPermissions {
                list: ListPermissions {
                    view: true,
                    create: true,
                },
                actions: user_actions,
            },
            system_management: SystemManagementPermissions {
                roles: RoleManagementPermissions {
                    view: true,
                    create: true,
                },
                settings: SettingsPermissions { view: true },
            },
        }
    }
}

/// Dashboard widget visibility flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPermissions {
    /// Access to the dashboard page itself.
    #[serde(default, deserialize_with = "lenient")]
    pub general: GeneralDashboardPermissions,
    /// Per-card visibility for the overview row.
    #[serde(default, deserialize_with = "lenient")]
    pub overview_cards: OverviewCardPermissions,
    /// Per-chart visibility.
    #[serde(default, deserialize_with = "lenient")]
    pub charts: ChartPermissions,
    /// Recent-activity feed visibility.
    #[serde(default, deserialize_with = "lenient")]
    pub recent_activities: RecentActivityPermissions,
}

impl DashboardPermissions {
    /// Grants every dashboard widget.
    #[must_use]
    pub fn full_access() -> Self {
        Self {
            general: GeneralDashboardPermissions { view: true },
            overview_cards: OverviewCardPermissions {
                view_total_employees: true,
                view_new_hires: true,
                view_active_roles: true,
            },
            charts: ChartPermissions {
                view_gender_distribution: true,
                view_position_distribution: true,
            },
            recent_activities: RecentActivityPermissions {
                view_recent_activities: true,
            },
        }
    }
}

/// Dashboard page access.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralDashboardPermissions {
    /// Dashboard page may be opened.
    #[serde(default, deserialize_with = "lenient")]
    pub view: bool,
}

/// Overview card visibility flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewCardPermissions {
    /// Total-employee headcount card.
    #[serde(default, deserialize_with = "lenient")]
    pub view_total_employees: bool,
    /// New-hires-this-month card.
    #[serde(default, deserialize_with = "lenient")]
    pub view_new_hires: bool,
    /// Active-role-count card.
    #[serde(default, deserialize_with = "lenient")]
    pub view_active_roles: bool,
}

/// Chart visibility flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPermissions {
    /// Gender distribution chart.
    #[serde(default, deserialize_with = "lenient")]
    pub view_gender_distribution: bool,
    /// Position distribution chart.
    #[serde(default, deserialize_with = "lenient")]
    pub view_position_distribution: bool,
}

/// Recent-activity feed visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivityPermissions {
    /// Recent-activity feed may be shown.
    #[serde(default, deserialize_with = "lenient")]
    pub view_recent_activities: bool,
}

/// Employee record capabilities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeManagementPermissions {
    /// Per-field grants keyed by stored field name.
    #[serde(default, deserialize_with = "lenient")]
    pub fields: BTreeMap<String, FieldGrant>,
    /// Row action grants keyed by action name.
    #[serde(default, deserialize_with = "lenient")]
    pub actions: BTreeMap<String, bool>,
    /// Employee list access.
    #[serde(default, deserialize_with = "lenient")]
    pub list: ListPermissions,
}

/// List-level view/create access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPermissions {
    /// Listing may be shown.
    #[serde(default, deserialize_with = "lenient")]
    pub view: bool,
    /// New records may be created.
    #[serde(default, deserialize_with = "lenient")]
    pub create: bool,
}

/// User account capabilities.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserManagementPermissions {
    /// User list access.
    #[serde(default, deserialize_with = "lenient")]
    pub list: ListPermissions,
    /// Account action grants keyed by action name.
    #[serde(default, deserialize_with = "lenient")]
    pub actions: BTreeMap<String, bool>,
}

/// Role and settings administration capabilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemManagementPermissions {
    /// Role administration access.
    #[serde(default, deserialize_with = "lenient")]
    pub roles: RoleManagementPermissions,
    /// Settings page access.
    #[serde(default, deserialize_with = "lenient")]
    pub settings: SettingsPermissions,
}

/// Role administration access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleManagementPermissions {
    /// Roles may be listed.
    #[serde(default, deserialize_with = "lenient")]
    pub view: bool,
    /// New roles may be created.
    #[serde(default, deserialize_with = "lenient")]
    pub create: bool,
}

/// Settings page access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPermissions {
    /// Settings page may be opened.
    #[serde(default, deserialize_with = "lenient")]
    pub view: bool,
}

/// Decodes a node, substituting the default when the stored value has the
/// wrong shape. Keeps a malformed node from failing the whole document.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
