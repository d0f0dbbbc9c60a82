//! Employment period rules.
//!
//! Periods of one employee never overlap, at most one of them is active at
//! a time, and every scheduled absence lies inside its period.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::HrConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, EmploymentPeriod};

/// Upper bound for contracted weekly hours.
pub const MAX_WEEKLY_HOURS: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Returns the period that counts as active on `today`.
///
/// A period is active when it has no end date or its end date is not in the
/// past. Validated employees have at most one.
///
/// # Example
///
/// ```
/// use jornada_engine::calculation::find_active_period;
/// use jornada_engine::models::{Employee, EmploymentPeriod, Role};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let period = |id: &str, start: (i32, u32, u32), end: Option<(i32, u32, u32)>| EmploymentPeriod {
///     id: id.to_string(),
///     start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
///     end_date: end.map(|e| NaiveDate::from_ymd_opt(e.0, e.1, e.2).unwrap()),
///     contract_type: "full_time".to_string(),
///     weekly_hours: Decimal::new(40, 0),
///     opening_balances: Default::default(),
///     scheduled_absences: vec![],
/// };
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "Lucía Pérez".to_string(),
///     email: "lucia@example.com".to_string(),
///     group_id: None,
///     role: Role::Employee,
///     employment_periods: vec![
///         period("old", (2022, 1, 1), Some((2023, 12, 31))),
///         period("current", (2024, 2, 1), None),
///     ],
/// };
/// let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
/// assert_eq!(find_active_period(&employee, today).unwrap().id, "current");
/// ```
pub fn find_active_period(employee: &Employee, today: NaiveDate) -> Option<&EmploymentPeriod> {
    employee
        .employment_periods
        .iter()
        .find(|p| p.is_active(today))
}

fn invalid(period: &EmploymentPeriod, message: impl Into<String>) -> EngineError {
    EngineError::InvalidEmploymentPeriod {
        period_id: period.id.clone(),
        message: message.into(),
    }
}

/// Validates a single period and its scheduled absences.
fn validate_period(period: &EmploymentPeriod, config: &HrConfig) -> EngineResult<()> {
    if period.end_date.is_some_and(|end| end < period.start_date) {
        return Err(invalid(period, "end date is before start date"));
    }
    if period.weekly_hours <= Decimal::ZERO || period.weekly_hours > MAX_WEEKLY_HOURS {
        return Err(invalid(
            period,
            format!("weekly hours must be within (0, {}]", MAX_WEEKLY_HOURS),
        ));
    }
    if !config.contract_types().contains_key(&period.contract_type) {
        return Err(EngineError::ContractTypeNotFound {
            code: period.contract_type.clone(),
        });
    }

    let mut absence_ids = HashSet::new();
    for absence in &period.scheduled_absences {
        if !absence_ids.insert(absence.id.as_str()) {
            return Err(invalid(period, format!("duplicate absence id '{}'", absence.id)));
        }
        if !config.absence_types().contains_key(&absence.absence_type_id) {
            return Err(EngineError::AbsenceTypeNotFound {
                id: absence.absence_type_id.clone(),
            });
        }
        if absence.end_date.is_some_and(|end| end < absence.start_date) {
            return Err(invalid(
                period,
                format!("absence '{}' ends before it starts", absence.id),
            ));
        }
        if !period.contains(absence.start_date) {
            return Err(invalid(
                period,
                format!("absence '{}' starts outside the period", absence.id),
            ));
        }
        let ends_inside = match (absence.end_date, period.end_date) {
            (_, None) => true,
            (Some(end), Some(_)) => period.contains(end),
            (None, Some(_)) => false,
        };
        if !ends_inside {
            return Err(invalid(
                period,
                format!("absence '{}' ends outside the period", absence.id),
            ));
        }
    }

    Ok(())
}

/// Validates all employment periods of an employee.
///
/// # Errors
///
/// - [`EngineError::InvalidEmploymentPeriod`] when a period ends before it
///   starts, has out-of-range weekly hours, overlaps another period, more than
///   one period is active on `today`, or an absence lies outside its period
/// - [`EngineError::ContractTypeNotFound`] / [`EngineError::AbsenceTypeNotFound`]
///   for unknown catalog references
pub fn validate_employment_periods(
    employee: &Employee,
    config: &HrConfig,
    today: NaiveDate,
) -> EngineResult<()> {
    let mut ids = HashSet::new();
    for period in &employee.employment_periods {
        if !ids.insert(period.id.as_str()) {
            return Err(invalid(period, "duplicate period id"));
        }
        validate_period(period, config)?;
    }

    let mut sorted: Vec<&EmploymentPeriod> = employee.employment_periods.iter().collect();
    sorted.sort_by_key(|p| p.start_date);
    for pair in sorted.windows(2) {
        let (earlier, later) = (pair[0], pair[1]);
        let overlapping = match (earlier.span(), later.span()) {
            (Some(a), Some(b)) => a.overlaps(&b),
            _ => false,
        };
        if overlapping {
            return Err(invalid(
                later,
                format!("overlaps period '{}'", earlier.id),
            ));
        }
    }

    let active: Vec<&str> = employee
        .employment_periods
        .iter()
        .filter(|p| p.is_active(today))
        .map(|p| p.id.as_str())
        .collect();
    if active.len() > 1 {
        return Err(EngineError::InvalidEmploymentPeriod {
            period_id: active[1].to_string(),
            message: format!("only one active period allowed, found {}", active.join(", ")),
        });
    }

    Ok(())
}
