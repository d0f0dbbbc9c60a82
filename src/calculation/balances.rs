//! Hour-bag balances.
//!
//! This module turns confirmed weekly records into movements of the three
//! hour bags (ordinary, holiday, leave) and the final balances of an
//! employee as of the end of a year.

use std::time::Instant;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::{ContractType, HolidayType, HrConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditTrace, BagKind, BagMovement, BalanceReport, DailyData, Employee, EmploymentPeriod,
    FinalBalances, WeeklyRecord, round_hours,
};

use super::day_kind::{DayKind, classify_day, daily_hours, daily_theoretical_hours};

/// The bag movements produced by a single day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayOutcome {
    /// Hours the day owed.
    pub theoretical: Decimal,
    /// Movements kept, per bag.
    pub kept: FinalBalances,
    /// Movements dropped because the contract does not compute the bag.
    pub discarded: FinalBalances,
}

fn computes(contract: &ContractType, bag: BagKind) -> bool {
    match bag {
        BagKind::Ordinary => contract.computes_ordinary_bag,
        BagKind::Holiday => contract.computes_holiday_bag,
        BagKind::Leave => contract.computes_off_day_bag,
    }
}

/// Evaluates one logged day of an employment period.
///
/// - Worked hours on a holiday go to the holiday bag when the contract keeps
///   it, otherwise to the ordinary bag. Working an Apertura holiday also
///   earns one compensatory day in the leave bag.
/// - A recorded absence covers the whole theoretical day, or its
///   `absence_hours` when the absence type is splittable.
/// - Leave and holiday hours taken debit their bag and count as covered time.
/// - The ordinary bag moves by worked + covered + taken − theoretical.
///
/// # Errors
///
/// Returns [`EngineError::AbsenceTypeNotFound`] for an unknown absence type.
pub fn evaluate_day(
    period: &EmploymentPeriod,
    contract: &ContractType,
    date: NaiveDate,
    day: &DailyData,
    config: &HrConfig,
) -> EngineResult<DayOutcome> {
    let theoretical = daily_theoretical_hours(period, date, config);

    let covered = match &day.absence_type_id {
        Some(id) => {
            let absence_type = config
                .absence_types()
                .get(id)
                .ok_or_else(|| EngineError::AbsenceTypeNotFound { id: id.clone() })?;
            if absence_type.is_absence_splittable {
                day.absence_hours
            } else {
                theoretical
            }
        }
        None => Decimal::ZERO,
    };

    let mut raw = FinalBalances::default();
    raw.add(
        BagKind::Ordinary,
        covered + day.leave_hours_taken + day.holiday_hours_taken - theoretical,
    );
    raw.add(BagKind::Holiday, -day.holiday_hours_taken);
    raw.add(BagKind::Leave, -day.leave_hours_taken);

    match classify_day(date, config) {
        DayKind::Holiday(holiday_type) => {
            if contract.computes_holiday_bag {
                raw.add(BagKind::Holiday, day.worked_hours);
            } else {
                raw.add(BagKind::Ordinary, day.worked_hours);
            }
            if holiday_type == HolidayType::Apertura && day.worked_hours > Decimal::ZERO {
                raw.add(BagKind::Leave, daily_hours(period));
            }
        }
        DayKind::Workday | DayKind::Weekend => raw.add(BagKind::Ordinary, day.worked_hours),
    }

    let mut outcome = DayOutcome {
        theoretical,
        ..DayOutcome::default()
    };
    for bag in [BagKind::Ordinary, BagKind::Holiday, BagKind::Leave] {
        let hours = raw.bag(bag);
        if hours.is_zero() {
            continue;
        }
        if computes(contract, bag) {
            outcome.kept.add(bag, hours);
        } else {
            outcome.discarded.add(bag, hours);
        }
    }

    Ok(outcome)
}

/// Calculates the hour-bag balances of an employee as of 31 December of `year`.
///
/// Only employee-weeks marked as confirmed contribute. Days after the end of
/// the year are ignored; days before it accumulate into `carried_over`
/// together with the opening balances of every period starting on or before
/// the end of the year. Days within the year produce weekly movements.
///
/// # Errors
///
/// - [`EngineError::ContractTypeNotFound`] for a period with an unknown contract
/// - [`EngineError::AbsenceTypeNotFound`] for a day with an unknown absence type
/// - [`EngineError::CalculationError`] for a year outside the calendar range
pub fn get_final_balances(
    employee: &Employee,
    year: i32,
    records: &[WeeklyRecord],
    config: &HrConfig,
) -> EngineResult<BalanceReport> {
    let started = Instant::now();
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(|| {
        EngineError::CalculationError {
            message: format!("year {} is out of range", year),
        }
    })?;

    let mut trace = AuditTrace::default();
    let mut carried = FinalBalances::default();
    let mut balances_in_year = FinalBalances::default();
    let mut movements = Vec::new();

    for period in &employee.employment_periods {
        if period.start_date > year_end {
            continue;
        }
        let contract = contract_for(period, config)?;
        let opening = period.opening_balances;
        for (bag, hours) in [
            (BagKind::Ordinary, opening.ordinary),
            (BagKind::Holiday, opening.holiday),
            (BagKind::Leave, opening.leave),
        ] {
            if !hours.is_zero() && computes(contract, bag) {
                carried.add(bag, hours);
            }
        }
        if opening != Default::default() {
            trace.record(
                "opening_balances",
                "Opening Balances",
                serde_json::json!({
                    "period_id": period.id,
                    "contract_type": period.contract_type,
                    "ordinary": opening.ordinary.normalize().to_string(),
                    "holiday": opening.holiday.normalize().to_string(),
                    "leave": opening.leave.normalize().to_string(),
                }),
                serde_json::json!({
                    "carried_over": carried.rounded(),
                }),
                format!(
                    "Opening balances of period {} added for the bags contract '{}' computes",
                    period.id, period.contract_type
                ),
            );
        }
    }

    let mut weeks: Vec<&WeeklyRecord> = records
        .iter()
        .filter(|r| r.week_id.range().start <= year_end)
        .collect();
    weeks.sort_by_key(|r| r.week_id);

    let mut unconfirmed_in_year = 0u32;
    let mut carried_weeks = 0u32;

    for record in weeks {
        let Some(week) = record.employees.get(&employee.id) else {
            continue;
        };
        let in_year = record.week_id.range().end.year() >= year;
        if !week.confirmed {
            if in_year {
                unconfirmed_in_year += 1;
            }
            continue;
        }

        let mut week_kept = FinalBalances::default();
        let mut week_discarded = FinalBalances::default();
        let mut week_carried = FinalBalances::default();
        let mut week_theoretical = Decimal::ZERO;

        for date in record.week_id.range().iter_days() {
            if date > year_end {
                break;
            }
            let day = week.day(date);
            let Some(period) = employee.period_on(date) else {
                if day != DailyData::default() {
                    trace.warn(
                        "DATA_OUTSIDE_EMPLOYMENT",
                        format!("{} has data on {} outside any employment period", employee.id, date),
                        "medium",
                    );
                }
                continue;
            };
            let contract = contract_for(period, config)?;
            let outcome = evaluate_day(period, contract, date, &day, config)?;

            let target = if date.year() < year {
                &mut week_carried
            } else {
                week_theoretical += outcome.theoretical;
                &mut week_kept
            };
            for bag in [BagKind::Ordinary, BagKind::Holiday, BagKind::Leave] {
                target.add(bag, outcome.kept.bag(bag));
                if date.year() >= year {
                    week_discarded.add(bag, outcome.discarded.bag(bag));
                }
            }
        }

        for bag in [BagKind::Ordinary, BagKind::Holiday, BagKind::Leave] {
            carried.add(bag, week_carried.bag(bag));
        }
        if week_carried != FinalBalances::default() {
            carried_weeks += 1;
        }

        if !in_year {
            continue;
        }

        for bag in [BagKind::Ordinary, BagKind::Holiday, BagKind::Leave] {
            let hours = week_kept.bag(bag);
            if !hours.is_zero() {
                movements.push(BagMovement {
                    week_id: record.week_id,
                    bag,
                    hours: round_hours(hours),
                });
                balances_in_year.add(bag, hours);
            }
        }

        trace.record(
            "weekly_bag_movements",
            "Weekly Bag Movements",
            serde_json::json!({
                "week_id": record.week_id,
                "theoretical_hours": round_hours(week_theoretical).normalize().to_string(),
                "confirmed_by": week.confirmed_by,
            }),
            serde_json::json!({
                "kept": week_kept.rounded(),
                "discarded": week_discarded.rounded(),
            }),
            if week_discarded == FinalBalances::default() {
                format!(
                    "Week {}: ordinary {} h, holiday {} h, leave {} h",
                    record.week_id,
                    round_hours(week_kept.ordinary).normalize(),
                    round_hours(week_kept.holiday).normalize(),
                    round_hours(week_kept.leave).normalize()
                )
            } else {
                format!(
                    "Week {}: kept {} h; {} h dropped for bags the contract does not compute",
                    record.week_id,
                    round_hours(week_kept.total).normalize(),
                    round_hours(week_discarded.total).normalize()
                )
            },
        );
    }

    if carried_weeks > 0 {
        trace.record(
            "carried_over",
            "Balances Carried Over",
            serde_json::json!({ "weeks_before_year": carried_weeks }),
            serde_json::json!({ "carried_over": carried.rounded() }),
            format!(
                "{} confirmed weeks before {} carried into the opening balance",
                carried_weeks, year
            ),
        );
    }

    if unconfirmed_in_year > 0 {
        trace.warn(
            "UNCONFIRMED_WEEKS",
            format!(
                "{} week(s) of {} are recorded but not confirmed and were not counted",
                unconfirmed_in_year, year
            ),
            "low",
        );
    }

    let mut balances = carried;
    for bag in [BagKind::Ordinary, BagKind::Holiday, BagKind::Leave] {
        balances.add(bag, balances_in_year.bag(bag));
    }

    trace.duration_us = started.elapsed().as_micros() as u64;

    Ok(BalanceReport {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee_id: employee.id.clone(),
        year,
        carried_over: carried.rounded(),
        movements,
        balances: balances.rounded(),
        audit_trace: trace,
    })
}

fn contract_for<'a>(
    period: &EmploymentPeriod,
    config: &'a HrConfig,
) -> EngineResult<&'a ContractType> {
    config
        .contract_types()
        .get(&period.contract_type)
        .ok_or_else(|| EngineError::ContractTypeNotFound {
            code: period.contract_type.clone(),
        })
}
