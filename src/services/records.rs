//! Weekly records: logging days, confirming and reopening weeks.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{DailyData, EmployeeWeek, WeekId, WeeklyRecord};
use crate::store::{Store, StoreData};

/// Upper bound for any hour figure logged on a single day.
const MAX_DAILY_HOURS: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// Returns the record of a week, empty if nothing was logged.
pub async fn get_week(store: &Store, week_id: WeekId) -> WeeklyRecord {
    store
        .read()
        .await
        .weekly_records
        .get(&week_id)
        .cloned()
        .unwrap_or_else(|| WeeklyRecord::new(week_id))
}

fn invalid(week_id: WeekId, message: impl Into<String>) -> EngineError {
    EngineError::InvalidWeeklyRecord {
        week_id: week_id.to_string(),
        message: message.into(),
    }
}

fn validate_days(
    data: &StoreData,
    week_id: WeekId,
    employee_id: &str,
    days: &BTreeMap<NaiveDate, DailyData>,
) -> EngineResult<()> {
    let employee = data.employee(employee_id)?;
    let range = week_id.range();
    if !employee.is_employed_within(&range) {
        return Err(invalid(
            week_id,
            format!("employee {} has no employment period in this week", employee_id),
        ));
    }

    for (date, day) in days {
        if !range.contains(*date) {
            return Err(invalid(week_id, format!("{} is not in this week", date)));
        }
        for (field, hours) in [
            ("worked_hours", day.worked_hours),
            ("absence_hours", day.absence_hours),
            ("leave_hours_taken", day.leave_hours_taken),
            ("holiday_hours_taken", day.holiday_hours_taken),
        ] {
            if hours < Decimal::ZERO || hours > MAX_DAILY_HOURS {
                return Err(invalid(
                    week_id,
                    format!("{} on {} must be between 0 and 24", field, date),
                ));
            }
        }
        match &day.absence_type_id {
            Some(type_id) => {
                let absence_type = data.config.absence_types().get(type_id).ok_or_else(|| {
                    EngineError::AbsenceTypeNotFound {
                        id: type_id.clone(),
                    }
                })?;
                if day.absence_hours > Decimal::ZERO && !absence_type.is_absence_splittable {
                    return Err(invalid(
                        week_id,
                        format!("absence type {} on {} cannot be split into hours", type_id, date),
                    ));
                }
            }
            None if day.absence_hours > Decimal::ZERO => {
                return Err(invalid(
                    week_id,
                    format!("absence hours on {} need an absence type", date),
                ));
            }
            None => {}
        }
    }
    Ok(())
}

/// Stores the days an employee logged for a week, replacing earlier data.
///
/// # Errors
///
/// - [`EngineError::WeekAlreadyConfirmed`] if the employee-week is confirmed
/// - [`EngineError::InvalidWeeklyRecord`] for days outside the week, hours
///   outside `[0, 24]`, partial hours on a whole-day absence, or an employee
///   not employed that week
/// - [`EngineError::AbsenceTypeNotFound`] / [`EngineError::EmployeeNotFound`]
pub async fn upsert_employee_week(
    store: &Store,
    week_id: WeekId,
    employee_id: &str,
    days: BTreeMap<NaiveDate, DailyData>,
    notes: Option<String>,
) -> EngineResult<EmployeeWeek> {
    let day_count = days.len();
    let saved = store
        .mutate(|data| {
            if data
                .weekly_records
                .get(&week_id)
                .is_some_and(|r| r.is_confirmed_for(employee_id))
            {
                return Err(EngineError::WeekAlreadyConfirmed {
                    week_id: week_id.to_string(),
                    employee_id: employee_id.to_string(),
                });
            }
            validate_days(data, week_id, employee_id, &days)?;

            let week = EmployeeWeek {
                days,
                notes: notes.filter(|n| !n.trim().is_empty()),
                ..EmployeeWeek::default()
            };
            data.weekly_records
                .entry(week_id)
                .or_insert_with(|| WeeklyRecord::new(week_id))
                .employees
                .insert(employee_id.to_string(), week.clone());
            Ok(week)
        })
        .await?;

    info!(week_id = %week_id, employee_id = %employee_id, days = day_count, "Employee week saved");
    Ok(saved)
}

/// Marks an employee-week as confirmed.
///
/// An employee employed that week but without logged data gets an empty,
/// confirmed week.
pub async fn confirm_employee_week(
    store: &Store,
    week_id: WeekId,
    employee_id: &str,
    confirmed_by: &str,
    now: DateTime<Utc>,
) -> EngineResult<EmployeeWeek> {
    let confirmed = store
        .mutate(|data| {
            let employee = data.employee(employee_id)?;
            if !employee.is_employed_within(&week_id.range()) {
                return Err(invalid(
                    week_id,
                    format!("employee {} has no employment period in this week", employee_id),
                ));
            }
            let week = data
                .weekly_records
                .entry(week_id)
                .or_insert_with(|| WeeklyRecord::new(week_id))
                .employees
                .entry(employee_id.to_string())
                .or_default();
            if week.confirmed {
                return Err(EngineError::WeekAlreadyConfirmed {
                    week_id: week_id.to_string(),
                    employee_id: employee_id.to_string(),
                });
            }
            week.confirmed = true;
            week.confirmed_at = Some(now);
            week.confirmed_by = Some(confirmed_by.to_string());
            Ok(week.clone())
        })
        .await?;

    info!(week_id = %week_id, employee_id = %employee_id, confirmed_by = %confirmed_by, "Employee week confirmed");
    Ok(confirmed)
}

/// Reopens a confirmed employee-week for editing.
pub async fn reopen_employee_week(
    store: &Store,
    week_id: WeekId,
    employee_id: &str,
) -> EngineResult<EmployeeWeek> {
    let reopened = store
        .mutate(|data| {
            data.employee(employee_id)?;
            let week = data
                .weekly_records
                .get_mut(&week_id)
                .and_then(|r| r.employees.get_mut(employee_id))
                .ok_or_else(|| EngineError::NotFound {
                    entity: "employee week",
                    id: format!("{}/{}", week_id, employee_id),
                })?;
            week.confirmed = false;
            week.confirmed_at = None;
            week.confirmed_by = None;
            Ok(week.clone())
        })
        .await?;

    warn!(week_id = %week_id, employee_id = %employee_id, "Employee week reopened");
    Ok(reopened)
}

/// Confirms every recorded employee-week of a week; returns the record and
/// how many weeks changed.
pub async fn confirm_week(
    store: &Store,
    week_id: WeekId,
    confirmed_by: &str,
    now: DateTime<Utc>,
) -> EngineResult<(WeeklyRecord, usize)> {
    let (record, changed) = store
        .mutate(|data| {
            let record = data
                .weekly_records
                .get_mut(&week_id)
                .ok_or_else(|| EngineError::NotFound {
                    entity: "weekly record",
                    id: week_id.to_string(),
                })?;
            let mut changed = 0;
            for week in record.employees.values_mut().filter(|w| !w.confirmed) {
                week.confirmed = true;
                week.confirmed_at = Some(now);
                week.confirmed_by = Some(confirmed_by.to_string());
                changed += 1;
            }
            Ok((record.clone(), changed))
        })
        .await?;

    info!(week_id = %week_id, confirmed = changed, confirmed_by = %confirmed_by, "Week confirmed");
    Ok((record, changed))
}
