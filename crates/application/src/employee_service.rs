use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::{Map, Value, json};
use staffhub_core::{AppError, AppResult, UserIdentity};
use staffhub_domain::{
    ActionSpec, ColumnSpec, Employee, EmployeeAction, EmployeeField, EmployeeId, available_actions,
    can_create_employee, can_perform_action, can_view_employee_list, field_permission,
    visible_columns,
};

use crate::access_service::AccessService;
use crate::employee_ports::{CreateEmployeeInput, EmployeeRepository};
use crate::permission_cache::Clock;

/// Incoming payload for employee updates: stored field values keyed by
/// field name. Every supplied field must be writable by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateEmployeeInput {
    /// New field values keyed by stored field name.
    pub fields: BTreeMap<String, Value>,
}

/// Employee list projected to the caller's grants.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeListing {
    /// Columns the caller may see, in fixed declaration order.
    pub columns: Vec<ColumnSpec>,
    /// Row actions the caller may take.
    pub actions: Vec<ActionSpec>,
    /// Records containing only readable fields plus the record id.
    pub employees: Vec<Map<String, Value>>,
}

/// Application service for employee records.
///
/// Every operation resolves the caller's permissions first and degrades
/// to denial when no document is available.
#[derive(Clone)]
pub struct EmployeeService {
    repository: Arc<dyn EmployeeRepository>,
    access: AccessService,
    clock: Arc<dyn Clock>,
}

impl EmployeeService {
    /// Creates an employee service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn EmployeeRepository>,
        access: AccessService,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            access,
            clock,
        }
    }

    /// Returns the employee list projected to the caller's grants.
    pub async fn list_employees(&self, actor: &UserIdentity) -> AppResult<EmployeeListing> {
        let auth = self.access.resolve_for(actor).await;
        let permissions = auth.permissions.as_ref();

        if !can_view_employee_list(permissions) {
            return Err(AppError::Forbidden(
                "employee list view is not granted".to_owned(),
            ));
        }

        let columns = visible_columns(permissions);
        let actions = available_actions(permissions);
        let today = self.clock.now().date_naive();

        let employees = self
            .repository
            .list_employees()
            .await?
            .iter()
            .map(|employee| project_employee(employee, &columns, today))
            .collect();

        Ok(EmployeeListing {
            columns,
            actions,
            employees,
        })
    }

    /// Returns one employee projected to the caller's readable fields.
    pub async fn get_employee(
        &self,
        actor: &UserIdentity,
        id: EmployeeId,
    ) -> AppResult<Map<String, Value>> {
        let auth = self.access.resolve_for(actor).await;
        let permissions = auth.permissions.as_ref();

        if !can_perform_action(permissions, EmployeeAction::View) {
            return Err(AppError::Forbidden(
                "employee view action is not granted".to_owned(),
            ));
        }

        let employee = self
            .repository
            .find_employee(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("employee '{id}' was not found")))?;

        let columns = visible_columns(permissions);
        Ok(project_employee(
            &employee,
            &columns,
            self.clock.now().date_naive(),
        ))
    }

    /// Creates an employee record.
    ///
    /// Requires list-level create access and write access on every
    /// stored field, since the payload populates all of them.
    pub async fn create_employee(
        &self,
        actor: &UserIdentity,
        input: CreateEmployeeInput,
    ) -> AppResult<Employee> {
        let auth = self.access.resolve_for(actor).await;
        let permissions = auth.permissions.as_ref();
        let role = auth.user_role.as_deref().unwrap_or_default();

        if !can_create_employee(permissions) {
            return Err(AppError::Forbidden(
                "employee creation is not granted".to_owned(),
            ));
        }

        for field in EmployeeField::all() {
            if field.is_stored() && !field_permission(permissions, role, *field).write {
                return Err(AppError::Forbidden(format!(
                    "no write access to field '{}'",
                    field.as_str()
                )));
            }
        }

        if input.name.trim().is_empty() {
            return Err(AppError::Validation(
                "employee name is required".to_owned(),
            ));
        }

        let employee = Employee {
            id: EmployeeId::new(),
            name: input.name,
            join_date: input.join_date,
            gender: input.gender,
            dob: input.dob,
            phone_no: input.phone_no,
            position: input.position,
            created_at: self.clock.now(),
        };

        self.repository.insert_employee(&employee).await?;
        Ok(employee)
    }

    /// Applies field updates to an employee record.
    ///
    /// Requires the edit action; every supplied field must be stored and
    /// writable by the caller, otherwise the whole update is rejected.
    pub async fn update_employee(
        &self,
        actor: &UserIdentity,
        id: EmployeeId,
        input: UpdateEmployeeInput,
    ) -> AppResult<Employee> {
        let auth = self.access.resolve_for(actor).await;
        let permissions = auth.permissions.as_ref();
        let role = auth.user_role.as_deref().unwrap_or_default();

        if !can_perform_action(permissions, EmployeeAction::Edit) {
            return Err(AppError::Forbidden(
                "employee edit action is not granted".to_owned(),
            ));
        }

        let mut employee = self
            .repository
            .find_employee(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("employee '{id}' was not found")))?;

        for (key, value) in &input.fields {
            let field = EmployeeField::from_str(key)?;
            if !field.is_stored() {
                return Err(AppError::Validation(format!(
                    "field '{key}' is derived and cannot be written"
                )));
            }

            if !field_permission(permissions, role, field).write {
                return Err(AppError::Forbidden(format!(
                    "no write access to field '{key}'"
                )));
            }

            apply_field(&mut employee, field, value)?;
        }

        self.repository.update_employee(&employee).await?;
        Ok(employee)
    }

    /// Deletes an employee record.
    pub async fn delete_employee(&self, actor: &UserIdentity, id: EmployeeId) -> AppResult<()> {
        let auth = self.access.resolve_for(actor).await;

        if !can_perform_action(auth.permissions.as_ref(), EmployeeAction::Delete) {
            return Err(AppError::Forbidden(
                "employee delete action is not granted".to_owned(),
            ));
        }

        if !self.repository.delete_employee(id).await? {
            return Err(AppError::NotFound(format!("employee '{id}' was not found")));
        }

        Ok(())
    }
}

fn project_employee(
    employee: &Employee,
    columns: &[ColumnSpec],
    today: NaiveDate,
) -> Map<String, Value> {
    let mut record = Map::new();
    record.insert("id".to_owned(), json!(employee.id.to_string()));

    for column in columns {
        let value = match column.field {
            EmployeeField::Name => json!(employee.name),
            EmployeeField::JoinDate => json!(employee.join_date.to_string()),
            EmployeeField::ServiceYears => json!(employee.service_years(today)),
            EmployeeField::Gender => json!(employee.gender),
            EmployeeField::Dob => json!(employee.dob.to_string()),
            EmployeeField::PhoneNo => json!(employee.phone_no),
            EmployeeField::Position => json!(employee.position),
        };
        record.insert(column.field.as_str().to_owned(), value);
    }

    record
}

fn apply_field(employee: &mut Employee, field: EmployeeField, value: &Value) -> AppResult<()> {
    match field {
        EmployeeField::Name => employee.name = required_text(field, value)?,
        EmployeeField::JoinDate => employee.join_date = required_date(field, value)?,
        EmployeeField::Gender => employee.gender = required_text(field, value)?,
        EmployeeField::Dob => employee.dob = required_date(field, value)?,
        EmployeeField::PhoneNo => employee.phone_no = required_text(field, value)?,
        EmployeeField::Position => employee.position = required_text(field, value)?,
        // Derived fields are rejected before this point.
        EmployeeField::ServiceYears => {}
    }

    Ok(())
}

fn required_text(field: EmployeeField, value: &Value) -> AppResult<String> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| {
            AppError::Validation(format!("field '{}' must be a string", field.as_str()))
        })
}

fn required_date(field: EmployeeField, value: &Value) -> AppResult<NaiveDate> {
    let text = value.as_str().ok_or_else(|| {
        AppError::Validation(format!("field '{}' must be a date string", field.as_str()))
    })?;

    NaiveDate::from_str(text).map_err(|_| {
        AppError::Validation(format!(
            "field '{}' must be a YYYY-MM-DD date",
            field.as_str()
        ))
    })
}
