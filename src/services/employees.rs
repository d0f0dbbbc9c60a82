//! Employee records: listing, creation, replacement and deletion.

use chrono::NaiveDate;
use tracing::info;

use crate::calculation::validate_employment_periods;
use crate::error::{EngineError, EngineResult};
use crate::models::Employee;
use crate::store::{Store, StoreData};

/// Lists employees ordered by group, then name.
pub async fn list_employees(store: &Store) -> Vec<Employee> {
    let data = store.read().await;
    sorted_employees(&data).into_iter().cloned().collect()
}

/// Employees ordered by their group's `order`, then by name.
pub(crate) fn sorted_employees(data: &StoreData) -> Vec<&Employee> {
    let mut employees: Vec<&Employee> = data.employees.values().collect();
    employees.sort_by(|a, b| {
        let a_order = data.config.group_order(a.group_id.as_deref());
        let b_order = data.config.group_order(b.group_id.as_deref());
        a_order.cmp(&b_order).then_with(|| a.name.cmp(&b.name))
    });
    employees
}

/// Returns one employee.
pub async fn get_employee(store: &Store, id: &str) -> EngineResult<Employee> {
    store.read().await.employee(id).cloned()
}

fn validate_employee(data: &StoreData, employee: &Employee, today: NaiveDate) -> EngineResult<()> {
    if employee.name.trim().is_empty() {
        return Err(EngineError::validation("name", "must not be empty"));
    }
    let email = employee.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(EngineError::validation("email", "must be a valid email address"));
    }
    if let Some(other) = data.employee_by_email(email)
        && other.id != employee.id
    {
        return Err(EngineError::validation(
            "email",
            format!("already used by employee {}", other.id),
        ));
    }
    if let Some(group_id) = &employee.group_id
        && !data.config.groups().iter().any(|g| &g.id == group_id)
    {
        return Err(EngineError::NotFound {
            entity: "group",
            id: group_id.clone(),
        });
    }
    validate_employment_periods(employee, &data.config, today)
}

/// Creates an employee after validating it and its employment periods.
///
/// # Errors
///
/// [`EngineError::ValidationError`] for a blank name, a bad or duplicate email
/// or a reused id; the period rules of
/// [`validate_employment_periods`] otherwise.
pub async fn create_employee(
    store: &Store,
    mut employee: Employee,
    today: NaiveDate,
) -> EngineResult<Employee> {
    employee.email = employee.email.trim().to_string();
    employee.sort_periods();
    let created = store
        .mutate(|data| {
            if data.employees.contains_key(&employee.id) {
                return Err(EngineError::validation(
                    "id",
                    format!("employee {} already exists", employee.id),
                ));
            }
            validate_employee(data, &employee, today)?;
            data.employees.insert(employee.id.clone(), employee.clone());
            Ok(employee)
        })
        .await?;

    info!(
        employee_id = %created.id,
        periods = created.employment_periods.len(),
        "Employee created"
    );
    Ok(created)
}

/// Replaces an existing employee.
pub async fn update_employee(
    store: &Store,
    id: &str,
    mut employee: Employee,
    today: NaiveDate,
) -> EngineResult<Employee> {
    employee.id = id.to_string();
    employee.email = employee.email.trim().to_string();
    employee.sort_periods();
    let updated = store
        .mutate(|data| {
            data.employee(id)?;
            validate_employee(data, &employee, today)?;
            data.employees.insert(employee.id.clone(), employee.clone());
            Ok(employee)
        })
        .await?;

    info!(employee_id = %updated.id, "Employee updated");
    Ok(updated)
}

/// Deletes an employee together with their weekly data and conversation.
pub async fn delete_employee(store: &Store, id: &str) -> EngineResult<()> {
    store
        .mutate(|data| {
            data.employees
                .remove(id)
                .ok_or_else(|| EngineError::EmployeeNotFound { id: id.to_string() })?;
            for record in data.weekly_records.values_mut() {
                record.employees.remove(id);
            }
            data.weekly_records.retain(|_, r| !r.employees.is_empty());
            data.conversations.remove(id);
            Ok(())
        })
        .await?;

    info!(employee_id = %id, "Employee deleted");
    Ok(())
}
