//! Vacation accounting.
//!
//! Accrues the yearly vacation allowance over the days an employee was
//! employed and counts the days consumed, either planned as scheduled
//! absences or logged in weekly records.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::{HrConfig, VacationDayMode};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditTrace, DateRange, Employee, VacationDay, VacationSource, VacationSummary, WeeklyRecord,
    days_in_year,
};

use super::day_kind::{DayKind, classify_day, daily_hours, is_suspended};

/// Rounds a number of days to the nearest half day.
///
/// ```
/// use jornada_engine::calculation::round_half_day;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_half_day(Decimal::new(1512, 2)), Decimal::new(150, 1));
/// assert_eq!(round_half_day(Decimal::new(1525, 2)), Decimal::new(155, 1));
/// ```
pub fn round_half_day(days: Decimal) -> Decimal {
    (days * Decimal::TWO).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        / Decimal::TWO
}

fn counts_in_mode(date: NaiveDate, mode: VacationDayMode, config: &HrConfig) -> bool {
    match mode {
        VacationDayMode::Natural => true,
        VacationDayMode::Working => classify_day(date, config) == DayKind::Workday,
    }
}

fn take(taken: &mut BTreeMap<NaiveDate, VacationDay>, day: VacationDay) {
    match taken.get(&day.date) {
        Some(existing) if existing.fraction >= day.fraction => {}
        _ => {
            taken.insert(day.date, day);
        }
    }
}

/// Calculates the vacation summary of an employee for a year.
///
/// Each period accrues `vacation_days × effective_days / days_in_year`, where
/// effective days are the period's days in the year not covered by a
/// contract-suspending absence. The sum is rounded to the nearest half day.
///
/// A date is taken once: scheduled absences of a type that counts as
/// vacation consume a whole day; weekly-record days consume a whole day, or
/// `absence_hours / daily hours` (at most one) for splittable types. When a
/// date appears in both, the larger fraction wins. Weekly records count
/// whether or not the week is confirmed.
///
/// # Errors
///
/// - [`EngineError::AnnualConfigNotFound`] if the year is not configured
/// - [`EngineError::AbsenceTypeNotFound`] for a weekly-record day with an
///   unknown absence type
pub fn calculate_employee_vacations(
    employee: &Employee,
    year: i32,
    records: &[WeeklyRecord],
    config: &HrConfig,
) -> EngineResult<VacationSummary> {
    let started = Instant::now();
    let annual = config
        .annual(year)
        .ok_or(EngineError::AnnualConfigNotFound { year })?;
    let year_range = DateRange::year(year).ok_or_else(|| EngineError::CalculationError {
        message: format!("year {} is out of range", year),
    })?;
    let year_days = Decimal::from(days_in_year(year));
    let mode = annual.vacation_day_mode;
    let mut trace = AuditTrace::default();

    // Accrual
    let mut accrued = Decimal::ZERO;
    for period in &employee.employment_periods {
        let Some(range) = period.range_within(&year_range) else {
            continue;
        };
        let effective_days = range
            .iter_days()
            .filter(|date| !is_suspended(period, *date, config))
            .count();
        let period_days = annual.vacation_days * Decimal::from(effective_days) / year_days;
        accrued += period_days;

        trace.record(
            "vacation_accrual",
            "Vacation Accrual per Employment Period",
            serde_json::json!({
                "period_id": period.id,
                "from": range.start.to_string(),
                "to": range.end.to_string(),
                "effective_days": effective_days,
            }),
            serde_json::json!({
                "days": period_days.round_dp(4).normalize().to_string(),
            }),
            format!(
                "{} x {}/{} days = {} vacation days",
                annual.vacation_days.normalize(),
                effective_days,
                year_days,
                period_days.round_dp(2).normalize()
            ),
        );
    }
    let days_available = round_half_day(accrued);

    // Consumption
    let mut taken: BTreeMap<NaiveDate, VacationDay> = BTreeMap::new();

    for period in &employee.employment_periods {
        let Some(period_range) = period.range_within(&year_range) else {
            continue;
        };
        for absence in &period.scheduled_absences {
            let counts = config
                .absence_types()
                .get(&absence.absence_type_id)
                .is_some_and(|t| t.counts_as_vacation);
            if !counts {
                continue;
            }
            let Some(range) = absence.range_within(&period_range) else {
                continue;
            };
            for date in range.iter_days() {
                if counts_in_mode(date, mode, config) {
                    take(
                        &mut taken,
                        VacationDay {
                            date,
                            fraction: Decimal::ONE,
                            source: VacationSource::Scheduled,
                        },
                    );
                }
            }
        }
    }

    for record in records {
        let Some(week) = record.employees.get(&employee.id) else {
            continue;
        };
        for (date, day) in &week.days {
            let Some(absence_type_id) = &day.absence_type_id else {
                continue;
            };
            if !year_range.contains(*date) || !counts_in_mode(*date, mode, config) {
                continue;
            }
            let absence_type = config.absence_types().get(absence_type_id).ok_or_else(|| {
                EngineError::AbsenceTypeNotFound {
                    id: absence_type_id.clone(),
                }
            })?;
            if !absence_type.counts_as_vacation {
                continue;
            }
            let fraction = if absence_type.is_absence_splittable {
                let Some(period) = employee.period_on(*date) else {
                    trace.warn(
                        "DATA_OUTSIDE_EMPLOYMENT",
                        format!(
                            "{} logged a partial vacation on {} outside any employment period",
                            employee.id, date
                        ),
                        "medium",
                    );
                    continue;
                };
                let hours = daily_hours(period);
                if hours.is_zero() {
                    continue;
                }
                (day.absence_hours / hours).min(Decimal::ONE)
            } else {
                Decimal::ONE
            };
            if fraction > Decimal::ZERO {
                take(
                    &mut taken,
                    VacationDay {
                        date: *date,
                        fraction,
                        source: VacationSource::WeeklyRecord,
                    },
                );
            }
        }
    }

    let days_taken: Decimal = taken.values().map(|day| day.fraction).sum();
    let days_taken = days_taken.round_dp(2);
    let days_remaining = days_available - days_taken;

    let scheduled = taken
        .values()
        .filter(|day| day.source == VacationSource::Scheduled)
        .count();
    trace.record(
        "vacation_balance",
        "Vacation Balance",
        serde_json::json!({
            "accrued": accrued.round_dp(4).normalize().to_string(),
            "mode": mode,
            "scheduled_dates": scheduled,
            "recorded_dates": taken.len() - scheduled,
        }),
        serde_json::json!({
            "days_available": days_available.normalize().to_string(),
            "days_taken": days_taken.normalize().to_string(),
            "days_remaining": days_remaining.normalize().to_string(),
        }),
        format!(
            "{} available (rounded to half days) - {} taken = {} remaining",
            days_available.normalize(),
            days_taken.normalize(),
            days_remaining.normalize()
        ),
    );

    if days_remaining < Decimal::ZERO {
        trace.warn(
            "VACATION_OVERDRAWN",
            format!(
                "{} has taken {} vacation days more than accrued in {}",
                employee.id,
                (-days_remaining).normalize(),
                year
            ),
            "high",
        );
    }

    trace.duration_us = started.elapsed().as_micros() as u64;

    Ok(VacationSummary {
        employee_id: employee.id.clone(),
        year,
        days_available,
        days_taken,
        days_remaining,
        taken: taken.into_values().collect(),
        audit_trace: trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AbsenceType, AnnualConfiguration, CompanyMetadata, Holiday, HolidayType,
    };
    use crate::models::{
        DailyData, EmployeeWeek, EmploymentPeriod, OpeningBalances, Role, ScheduledAbsence,
        WeekId,
    };
    use std::collections::HashMap;
    use std::str::FromStr;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn absence_type(splittable: bool, vacation: bool, suspends: bool) -> AbsenceType {
        AbsenceType {
            name: "Test".to_string(),
            abbreviation: String::new(),
            color: String::new(),
            is_absence_splittable: splittable,
            counts_as_vacation: vacation,
            suspends_contract: suspends,
        }
    }

    fn create_test_config(mode: VacationDayMode) -> HrConfig {
        let mut absence_types = HashMap::new();
        absence_types.insert("vacaciones".to_string(), absence_type(false, true, false));
        absence_types.insert("asuntos_propios".to_string(), absence_type(true, true, false));
        absence_types.insert("medico".to_string(), absence_type(true, false, false));
        absence_types.insert("excedencia".to_string(), absence_type(false, false, true));

        HrConfig::new(
            CompanyMetadata {
                name: "Test".to_string(),
                admin_emails: vec![],
            },
            HashMap::new(),
            absence_types,
            vec![AnnualConfiguration {
                year: 2025,
                max_annual_hours: dec("1780"),
                reference_weekly_hours: dec("40"),
                vacation_days: dec("30"),
                vacation_day_mode: mode,
            }],
            vec![Holiday {
                id: "h1".to_string(),
                name: "Asunción".to_string(),
                date: d("2025-08-15"),
                holiday_type: HolidayType::Nacional,
            }],
            vec![],
        )
    }

    fn period(start: &str, end: Option<&str>) -> EmploymentPeriod {
        EmploymentPeriod {
            id: format!("p_{}", start),
            start_date: d(start),
            end_date: end.map(d),
            contract_type: "full_time".to_string(),
            weekly_hours: dec("40"),
            opening_balances: OpeningBalances::default(),
            scheduled_absences: vec![],
        }
    }

    fn employee(periods: Vec<EmploymentPeriod>) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: "Test".to_string(),
            email: "t@example.com".to_string(),
            group_id: None,
            role: Role::Employee,
            employment_periods: periods,
        }
    }

    fn scheduled(type_id: &str, start: &str, end: Option<&str>) -> ScheduledAbsence {
        ScheduledAbsence {
            id: format!("a_{}", start),
            absence_type_id: type_id.to_string(),
            start_date: d(start),
            end_date: end.map(d),
        }
    }

    fn record(week_id: &str, days: Vec<(&str, DailyData)>, confirmed: bool) -> WeeklyRecord {
        let mut record = WeeklyRecord::new(WeekId::from_str(week_id).unwrap());
        record.employees.insert(
            "emp_001".to_string(),
            EmployeeWeek {
                days: days.into_iter().map(|(date, day)| (d(date), day)).collect(),
                confirmed,
                ..EmployeeWeek::default()
            },
        );
        record
    }

    fn absence(type_id: &str, hours: &str) -> DailyData {
        DailyData {
            absence_type_id: Some(type_id.to_string()),
            absence_hours: dec(hours),
            ..DailyData::default()
        }
    }

    #[test]
    fn test_full_year_accrues_full_allowance() {
        let config = create_test_config(VacationDayMode::Natural);
        let e = employee(vec![period("2020-01-01", None)]);

        let summary = calculate_employee_vacations(&e, 2025, &[], &config).unwrap();
        assert_eq!(summary.days_available, dec("30"));
        assert_eq!(summary.days_taken, Decimal::ZERO);
        assert_eq!(summary.days_remaining, dec("30"));
    }

    #[test]
    fn test_partial_year_rounds_to_half_day() {
        let config = create_test_config(VacationDayMode::Natural);
        // 1 July to 31 December: 30 x 184 / 365 = 15.12 → 15
        let e = employee(vec![period("2025-07-01", None)]);

        let summary = calculate_employee_vacations(&e, 2025, &[], &config).unwrap();
        assert_eq!(summary.days_available, dec("15"));
    }

    #[test]
    fn test_suspended_days_do_not_accrue() {
        let config = create_test_config(VacationDayMode::Natural);
        let mut p = period("2020-01-01", None);
        // 1 July to 31 December suspended: same accrual as a half year.
        p.scheduled_absences
            .push(scheduled("excedencia", "2025-07-01", Some("2025-12-31")));
        let e = employee(vec![p]);

        let summary = calculate_employee_vacations(&e, 2025, &[], &config).unwrap();
        assert_eq!(summary.days_available, dec("15"));
    }

    #[test]
    fn test_scheduled_vacation_counts_natural_days() {
        let config = create_test_config(VacationDayMode::Natural);
        let mut p = period("2020-01-01", None);
        // Monday 11 to Sunday 24 August, including the 15 August holiday.
        p.scheduled_absences
            .push(scheduled("vacaciones", "2025-08-11", Some("2025-08-24")));
        let e = employee(vec![p]);

        let summary = calculate_employee_vacations(&e, 2025, &[], &config).unwrap();
        assert_eq!(summary.days_taken, dec("14"));
        assert_eq!(summary.days_remaining, dec("16"));
    }

    #[test]
    fn test_working_mode_skips_weekends_and_holidays() {
        let config = create_test_config(VacationDayMode::Working);
        let mut p = period("2020-01-01", None);
        p.scheduled_absences
            .push(scheduled("vacaciones", "2025-08-11", Some("2025-08-24")));
        let e = employee(vec![p]);

        let summary = calculate_employee_vacations(&e, 2025, &[], &config).unwrap();
        // 10 weekdays minus the holiday.
        assert_eq!(summary.days_taken, dec("9"));
    }

    #[test]
    fn test_open_ended_vacation_clipped_to_year() {
        let config = create_test_config(VacationDayMode::Natural);
        let mut p = period("2020-01-01", None);
        p.scheduled_absences
            .push(scheduled("vacaciones", "2025-12-29", None));
        let e = employee(vec![p]);

        let summary = calculate_employee_vacations(&e, 2025, &[], &config).unwrap();
        assert_eq!(summary.days_taken, dec("3"));
    }

    #[test]
    fn test_non_vacation_absences_are_ignored() {
        let config = create_test_config(VacationDayMode::Natural);
        let records = vec![record("2025-W10", vec![("2025-03-03", absence("medico", "2"))], true)];
        let e = employee(vec![period("2020-01-01", None)]);

        let summary = calculate_employee_vacations(&e, 2025, &records, &config).unwrap();
        assert!(summary.taken.is_empty());
    }

    #[test]
    fn test_recorded_vacation_counts_even_unconfirmed() {
        let config = create_test_config(VacationDayMode::Natural);
        let records = vec![record(
            "2025-W10",
            vec![
                ("2025-03-03", absence("vacaciones", "0")),
                ("2025-03-04", absence("asuntos_propios", "4")),
            ],
            false,
        )];
        let e = employee(vec![period("2020-01-01", None)]);

        let summary = calculate_employee_vacations(&e, 2025, &records, &config).unwrap();
        assert_eq!(summary.days_taken, dec("1.5"));
        assert_eq!(summary.taken[1].fraction, dec("0.5"));
        assert_eq!(summary.taken[1].source, VacationSource::WeeklyRecord);
    }

    #[test]
    fn test_date_in_both_sources_counts_once() {
        let config = create_test_config(VacationDayMode::Natural);
        let mut p = period("2020-01-01", None);
        p.scheduled_absences
            .push(scheduled("vacaciones", "2025-03-03", Some("2025-03-04")));
        let e = employee(vec![p]);
        let records = vec![record(
            "2025-W10",
            vec![
                ("2025-03-03", absence("vacaciones", "0")),
                ("2025-03-04", absence("asuntos_propios", "2")),
            ],
            true,
        )];

        let summary = calculate_employee_vacations(&e, 2025, &records, &config).unwrap();
        assert_eq!(summary.days_taken, dec("2"));
        assert_eq!(summary.taken.len(), 2);
    }

    #[test]
    fn test_overdrawn_vacation_warns() {
        let config = create_test_config(VacationDayMode::Natural);
        let mut p = period("2025-07-01", None);
        p.scheduled_absences
            .push(scheduled("vacaciones", "2025-08-01", Some("2025-08-31")));
        let e = employee(vec![p]);

        let summary = calculate_employee_vacations(&e, 2025, &[], &config).unwrap();
        assert_eq!(summary.days_remaining, dec("-16"));
        assert_eq!(summary.audit_trace.warnings[0].code, "VACATION_OVERDRAWN");
    }

    #[test]
    fn test_missing_annual_config_returns_error() {
        let config = create_test_config(VacationDayMode::Natural);
        let e = employee(vec![period("2020-01-01", None)]);

        assert!(matches!(
            calculate_employee_vacations(&e, 2030, &[], &config),
            Err(EngineError::AnnualConfigNotFound { year: 2030 })
        ));
    }

    #[test]
    fn test_round_half_day() {
        assert_eq!(round_half_day(dec("15.12")), dec("15"));
        assert_eq!(round_half_day(dec("15.25")), dec("15.5"));
        assert_eq!(round_half_day(dec("15.74")), dec("15.5"));
        assert_eq!(round_half_day(dec("15.75")), dec("16"));
    }
}
