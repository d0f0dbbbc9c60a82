//! Catalog maintenance: holidays, groups, contract types, absence types and
//! annual configurations.
//!
//! The catalog is seeded from the YAML configuration directory and edited
//! through these operations afterwards. Types still referenced by an
//! employee or a weekly record cannot be removed.

use std::collections::BTreeMap;

use tracing::info;

use crate::config::{AbsenceType, AnnualConfiguration, ContractType, EmployeeGroup, Holiday};
use crate::error::{EngineError, EngineResult};
use crate::store::{Store, StoreData};

/// Lists holidays by date.
pub async fn list_holidays(store: &Store) -> Vec<Holiday> {
    store.read().await.config.holidays().to_vec()
}

/// Lists groups by their order.
pub async fn list_groups(store: &Store) -> Vec<EmployeeGroup> {
    store.read().await.config.groups().to_vec()
}

/// Lists contract types keyed by code.
pub async fn list_contract_types(store: &Store) -> BTreeMap<String, ContractType> {
    let data = store.read().await;
    data.config
        .contract_types()
        .iter()
        .map(|(code, contract_type)| (code.clone(), contract_type.clone()))
        .collect()
}

/// Lists absence types keyed by id.
pub async fn list_absence_types(store: &Store) -> BTreeMap<String, AbsenceType> {
    let data = store.read().await;
    data.config
        .absence_types()
        .iter()
        .map(|(id, absence_type)| (id.clone(), absence_type.clone()))
        .collect()
}

/// Lists annual configurations by year.
pub async fn list_annual_configurations(store: &Store) -> Vec<AnnualConfiguration> {
    let data = store.read().await;
    data.config.annual_configurations().values().cloned().collect()
}

fn require_id(field: &str, id: &str) -> EngineResult<()> {
    if id.trim().is_empty() {
        return Err(EngineError::validation(field, "must not be empty"));
    }
    Ok(())
}

/// Adds or replaces a holiday.
pub async fn upsert_holiday(store: &Store, holiday: Holiday) -> EngineResult<Holiday> {
    require_id("id", &holiday.id)?;
    if holiday.name.trim().is_empty() {
        return Err(EngineError::validation("name", "must not be empty"));
    }
    let saved = store
        .mutate(|data| {
            data.config.upsert_holiday(holiday.clone());
            Ok(holiday)
        })
        .await?;
    info!(holiday_id = %saved.id, date = %saved.date, holiday_type = %saved.holiday_type, "Holiday saved");
    Ok(saved)
}

/// Removes a holiday.
pub async fn delete_holiday(store: &Store, id: &str) -> EngineResult<()> {
    store
        .mutate(|data| {
            data.config
                .remove_holiday(id)
                .map(|_| ())
                .ok_or_else(|| EngineError::NotFound {
                    entity: "holiday",
                    id: id.to_string(),
                })
        })
        .await?;
    info!(holiday_id = %id, "Holiday deleted");
    Ok(())
}

/// Adds or replaces an employee group.
pub async fn upsert_group(store: &Store, group: EmployeeGroup) -> EngineResult<EmployeeGroup> {
    require_id("id", &group.id)?;
    if group.name.trim().is_empty() {
        return Err(EngineError::validation("name", "must not be empty"));
    }
    let saved = store
        .mutate(|data| {
            data.config.upsert_group(group.clone());
            Ok(group)
        })
        .await?;
    info!(group_id = %saved.id, order = saved.order, "Group saved");
    Ok(saved)
}

/// Removes a group no employee belongs to.
pub async fn delete_group(store: &Store, id: &str) -> EngineResult<()> {
    store
        .mutate(|data| {
            if let Some(employee) = data
                .employees
                .values()
                .find(|e| e.group_id.as_deref() == Some(id))
            {
                return Err(EngineError::validation(
                    "group",
                    format!("group {} still has employee {}", id, employee.id),
                ));
            }
            data.config
                .remove_group(id)
                .map(|_| ())
                .ok_or_else(|| EngineError::NotFound {
                    entity: "group",
                    id: id.to_string(),
                })
        })
        .await?;
    info!(group_id = %id, "Group deleted");
    Ok(())
}

/// Adds or replaces a contract type.
pub async fn upsert_contract_type(
    store: &Store,
    id: String,
    contract_type: ContractType,
) -> EngineResult<ContractType> {
    require_id("id", &id)?;
    if contract_type.name.trim().is_empty() {
        return Err(EngineError::validation("name", "must not be empty"));
    }
    store
        .mutate(|data| {
            data.config.upsert_contract_type(id.clone(), contract_type.clone());
            Ok(())
        })
        .await?;
    info!(contract_type = %id, "Contract type saved");
    Ok(contract_type)
}

/// Removes a contract type no employment period uses.
pub async fn delete_contract_type(store: &Store, id: &str) -> EngineResult<()> {
    store
        .mutate(|data| {
            let in_use = data.employees.values().find(|e| {
                e.employment_periods
                    .iter()
                    .any(|p| p.contract_type == id)
            });
            if let Some(employee) = in_use {
                return Err(EngineError::validation(
                    "contract_type",
                    format!("contract type {} is used by employee {}", id, employee.id),
                ));
            }
            data.config
                .remove_contract_type(id)
                .map(|_| ())
                .ok_or_else(|| EngineError::ContractTypeNotFound {
                    code: id.to_string(),
                })
        })
        .await?;
    info!(contract_type = %id, "Contract type deleted");
    Ok(())
}

/// Adds or replaces an absence type.
pub async fn upsert_absence_type(
    store: &Store,
    id: String,
    absence_type: AbsenceType,
) -> EngineResult<AbsenceType> {
    require_id("id", &id)?;
    if absence_type.name.trim().is_empty() {
        return Err(EngineError::validation("name", "must not be empty"));
    }
    store
        .mutate(|data| {
            data.config.upsert_absence_type(id.clone(), absence_type.clone());
            Ok(())
        })
        .await?;
    info!(absence_type = %id, "Absence type saved");
    Ok(absence_type)
}

fn absence_type_in_use(data: &StoreData, id: &str) -> Option<String> {
    let scheduled = data.employees.values().find(|e| {
        e.employment_periods
            .iter()
            .flat_map(|p| &p.scheduled_absences)
            .any(|a| a.absence_type_id == id)
    });
    if let Some(employee) = scheduled {
        return Some(format!("scheduled absences of employee {}", employee.id));
    }
    data.weekly_records.values().find_map(|record| {
        record
            .employees
            .values()
            .flat_map(|week| week.days.values())
            .any(|day| day.absence_type_id.as_deref() == Some(id))
            .then(|| format!("weekly record {}", record.week_id))
    })
}

/// Removes an absence type no scheduled absence or weekly record uses.
pub async fn delete_absence_type(store: &Store, id: &str) -> EngineResult<()> {
    store
        .mutate(|data| {
            if let Some(user) = absence_type_in_use(data, id) {
                return Err(EngineError::validation(
                    "absence_type",
                    format!("absence type {} is used by {}", id, user),
                ));
            }
            data.config
                .remove_absence_type(id)
                .map(|_| ())
                .ok_or_else(|| EngineError::AbsenceTypeNotFound { id: id.to_string() })
        })
        .await?;
    info!(absence_type = %id, "Absence type deleted");
    Ok(())
}

/// Adds or replaces the configuration of a year.
pub async fn upsert_annual_configuration(
    store: &Store,
    annual: AnnualConfiguration,
) -> EngineResult<AnnualConfiguration> {
    annual.validate()?;
    let saved = store
        .mutate(|data| {
            data.config.upsert_annual(annual.clone());
            Ok(annual)
        })
        .await?;
    info!(year = saved.year, max_annual_hours = %saved.max_annual_hours, "Annual configuration saved");
    Ok(saved)
}
