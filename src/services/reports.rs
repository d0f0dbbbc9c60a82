//! Per-employee calculations and the annual balance report.
//!
//! Inputs are cloned out of the store under the shared lock; the
//! calculations themselves run after the lock is released.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculation::{
    calculate_employee_vacations, calculate_theoretical_hours, get_final_balances,
};
use crate::config::HrConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    BalanceReport, DateRange, Employee, FinalBalances, TheoreticalHoursResult, VacationSummary,
    WeeklyRecord,
};
use crate::store::Store;

use super::employees::sorted_employees;

async fn employee_inputs(
    store: &Store,
    employee_id: &str,
) -> EngineResult<(Employee, Vec<WeeklyRecord>, HrConfig)> {
    let data = store.read().await;
    let employee = data.employee(employee_id)?.clone();
    let records = data.records_for(employee_id);
    Ok((employee, records, data.config.clone()))
}

/// Hour-bag balances of an employee at the end of `year`.
pub async fn employee_balances(
    store: &Store,
    employee_id: &str,
    year: i32,
) -> EngineResult<BalanceReport> {
    let (employee, records, config) = employee_inputs(store, employee_id).await?;
    let report = get_final_balances(&employee, year, &records, &config)?;
    info!(
        employee_id = %employee_id,
        year,
        total = %report.balances.total,
        duration_us = report.audit_trace.duration_us,
        "Balances calculated"
    );
    Ok(report)
}

/// Vacation summary of an employee for `year`.
pub async fn employee_vacations(
    store: &Store,
    employee_id: &str,
    year: i32,
) -> EngineResult<VacationSummary> {
    let (employee, records, config) = employee_inputs(store, employee_id).await?;
    let summary = calculate_employee_vacations(&employee, year, &records, &config)?;
    info!(
        employee_id = %employee_id,
        year,
        remaining = %summary.days_remaining,
        "Vacations calculated"
    );
    Ok(summary)
}

/// Theoretical annual hours of an employee for `year`.
pub async fn employee_theoretical_hours(
    store: &Store,
    employee_id: &str,
    year: i32,
) -> EngineResult<TheoreticalHoursResult> {
    let (employee, _, config) = employee_inputs(store, employee_id).await?;
    calculate_theoretical_hours(&employee, year, &config)
}

/// One employee's line in the annual report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualReportRow {
    /// The employee.
    pub employee_id: String,
    /// Their name.
    pub name: String,
    /// Their group, if any.
    pub group_id: Option<String>,
    /// Hours owed in the year.
    pub theoretical_hours: Decimal,
    /// Bag balances at 31 December.
    pub balances: FinalBalances,
    /// Vacation days accrued.
    pub vacation_days_available: Decimal,
    /// Vacation days taken.
    pub vacation_days_taken: Decimal,
    /// Vacation days left.
    pub vacation_days_remaining: Decimal,
}

/// The annual balance report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualReport {
    /// The year.
    pub year: i32,
    /// One row per employee employed during the year.
    pub rows: Vec<AnnualReportRow>,
}

/// Builds the annual report: every employee with a period overlapping
/// `year`, ordered by group order and then name.
///
/// # Errors
///
/// [`EngineError::AnnualConfigNotFound`] if the year is not configured, or
/// the first calculation error of any employee.
pub async fn annual_report(store: &Store, year: i32) -> EngineResult<AnnualReport> {
    let window = DateRange::year(year).ok_or_else(|| EngineError::validation("year", "out of range"))?;
    let (inputs, config) = {
        let data = store.read().await;
        if data.config.annual(year).is_none() {
            return Err(EngineError::AnnualConfigNotFound { year });
        }
        let inputs: Vec<(Employee, Vec<WeeklyRecord>)> = sorted_employees(&data)
            .into_iter()
            .filter(|e| e.is_employed_within(&window))
            .map(|e| (e.clone(), data.records_for(&e.id)))
            .collect();
        (inputs, data.config.clone())
    };

    let mut rows = Vec::with_capacity(inputs.len());
    for (employee, records) in &inputs {
        let theoretical = calculate_theoretical_hours(employee, year, &config)?;
        let balances = get_final_balances(employee, year, records, &config)?;
        let vacations = calculate_employee_vacations(employee, year, records, &config)?;
        rows.push(AnnualReportRow {
            employee_id: employee.id.clone(),
            name: employee.name.clone(),
            group_id: employee.group_id.clone(),
            theoretical_hours: theoretical.theoretical_hours,
            balances: balances.balances,
            vacation_days_available: vacations.days_available,
            vacation_days_taken: vacations.days_taken,
            vacation_days_remaining: vacations.days_remaining,
        });
    }

    info!(year, employees = rows.len(), "Annual report built");
    Ok(AnnualReport { year, rows })
}
