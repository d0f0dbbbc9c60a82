//! Theoretical annual hours.
//!
//! The hours an employee owes in a year: the calendar-based sum of daily
//! theoretical hours over their employment, capped by the annual ceiling
//! prorated to their contract and the days they were employed.

use std::time::Instant;

use rust_decimal::Decimal;

use crate::config::HrConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditTrace, DateRange, Employee, TheoreticalHoursResult, days_in_year, round_hours,
};

use super::day_kind::{DayKind, classify_day, daily_hours, is_suspended};

/// Calculates the theoretical annual hours of an employee.
///
/// For every date of the year inside an employment period (and not covered
/// by a contract-suspending absence) the period owes `weekly_hours / 5` on
/// working weekdays that are not holidays. The ceiling of each period is
/// `max_annual_hours × weekly_hours / reference_weekly_hours × effective_days
/// / days_in_year`. The result is the lower of the two sums.
///
/// # Errors
///
/// - [`EngineError::AnnualConfigNotFound`] if the year is not configured
/// - [`EngineError::CalculationError`] if the reference weekly hours are zero
///
/// # Example
///
/// ```no_run
/// use jornada_engine::calculation::calculate_theoretical_hours;
/// use jornada_engine::config::ConfigLoader;
/// # fn employee() -> jornada_engine::models::Employee { unimplemented!() }
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// let result = calculate_theoretical_hours(&employee(), 2025, loader.config()).unwrap();
/// println!("{} h", result.theoretical_hours);
/// ```
pub fn calculate_theoretical_hours(
    employee: &Employee,
    year: i32,
    config: &HrConfig,
) -> EngineResult<TheoreticalHoursResult> {
    let started = Instant::now();
    let annual = config
        .annual(year)
        .ok_or(EngineError::AnnualConfigNotFound { year })?;
    let year_range = DateRange::year(year).ok_or_else(|| EngineError::CalculationError {
        message: format!("year {} is out of range", year),
    })?;
    if annual.reference_weekly_hours <= Decimal::ZERO {
        return Err(EngineError::CalculationError {
            message: format!("reference weekly hours for {} must be positive", year),
        });
    }

    let year_days = Decimal::from(days_in_year(year));
    let mut trace = AuditTrace::default();
    let mut computed = Decimal::ZERO;
    let mut cap = Decimal::ZERO;
    let mut working_days: u32 = 0;

    for period in &employee.employment_periods {
        let Some(range) = period.range_within(&year_range) else {
            continue;
        };

        let mut period_hours = Decimal::ZERO;
        let mut period_working_days: u32 = 0;
        let mut effective_days: i64 = 0;
        let mut suspended_days: i64 = 0;
        let day_hours = daily_hours(period);

        for date in range.iter_days() {
            if is_suspended(period, date, config) {
                suspended_days += 1;
                continue;
            }
            effective_days += 1;
            if classify_day(date, config) == DayKind::Workday {
                period_hours += day_hours;
                period_working_days += 1;
            }
        }

        let period_cap = annual.max_annual_hours * period.weekly_hours
            / annual.reference_weekly_hours
            * Decimal::from(effective_days)
            / year_days;

        trace.record(
            "theoretical_hours_period",
            "Theoretical Hours per Employment Period",
            serde_json::json!({
                "period_id": period.id,
                "from": range.start.to_string(),
                "to": range.end.to_string(),
                "weekly_hours": period.weekly_hours.normalize().to_string(),
                "suspended_days": suspended_days,
            }),
            serde_json::json!({
                "working_days": period_working_days,
                "effective_days": effective_days,
                "computed_hours": round_hours(period_hours).normalize().to_string(),
                "cap_hours": round_hours(period_cap).normalize().to_string(),
            }),
            format!(
                "{} working days x {} h = {} h; ceiling {} x {}/{} x {}/{} days = {} h",
                period_working_days,
                day_hours.normalize(),
                round_hours(period_hours).normalize(),
                annual.max_annual_hours.normalize(),
                period.weekly_hours.normalize(),
                annual.reference_weekly_hours.normalize(),
                effective_days,
                year_days,
                round_hours(period_cap).normalize()
            ),
        );

        computed += period_hours;
        cap += period_cap;
        working_days += period_working_days;
    }

    let computed_hours = round_hours(computed);
    let cap_hours = round_hours(cap);
    let theoretical_hours = computed_hours.min(cap_hours);

    trace.record(
        "theoretical_hours_total",
        "Theoretical Annual Hours",
        serde_json::json!({
            "year": year,
            "computed_hours": computed_hours.normalize().to_string(),
            "cap_hours": cap_hours.normalize().to_string(),
        }),
        serde_json::json!({
            "theoretical_hours": theoretical_hours.normalize().to_string(),
        }),
        if cap_hours < computed_hours {
            format!(
                "Calendar hours {} exceed the annual ceiling; ceiling {} applies",
                computed_hours.normalize(),
                cap_hours.normalize()
            )
        } else {
            format!(
                "Calendar hours {} are within the annual ceiling {}",
                computed_hours.normalize(),
                cap_hours.normalize()
            )
        },
    );

    if employee.employment_periods.iter().all(|p| p.range_within(&year_range).is_none()) {
        trace.warn(
            "NOT_EMPLOYED_IN_YEAR",
            format!("Employee {} has no employment period in {}", employee.id, year),
            "low",
        );
    }

    trace.duration_us = started.elapsed().as_micros() as u64;

    Ok(TheoreticalHoursResult {
        employee_id: employee.id.clone(),
        year,
        computed_hours,
        cap_hours,
        theoretical_hours,
        working_days,
        audit_trace: trace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        AbsenceType, AnnualConfiguration, CompanyMetadata, Holiday, HolidayType, VacationDayMode,
    };
    use crate::models::{EmploymentPeriod, OpeningBalances, Role, ScheduledAbsence};
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::str::FromStr;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_config(max_annual: &str) -> HrConfig {
        let mut absence_types = HashMap::new();
        absence_types.insert(
            "excedencia".to_string(),
            AbsenceType {
                name: "Excedencia".to_string(),
                abbreviation: "EX".to_string(),
                color: String::new(),
                is_absence_splittable: false,
                counts_as_vacation: false,
                suspends_contract: true,
            },
        );
        HrConfig::new(
            CompanyMetadata {
                name: "Test".to_string(),
                admin_emails: vec![],
            },
            HashMap::new(),
            absence_types,
            vec![AnnualConfiguration {
                year: 2025,
                max_annual_hours: dec(max_annual),
                reference_weekly_hours: dec("40"),
                vacation_days: dec("30"),
                vacation_day_mode: VacationDayMode::Natural,
            }],
            vec![Holiday {
                id: "h1".to_string(),
                name: "Año Nuevo".to_string(),
                date: d("2025-01-01"),
                holiday_type: HolidayType::Nacional,
            }],
            vec![],
        )
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

    fn period(start: &str, end: Option<&str>, weekly: &str) -> EmploymentPeriod {
        EmploymentPeriod {
            id: format!("p_{}", start),
            start_date: d(start),
            end_date: end.map(d),
            contract_type: "full_time".to_string(),
            weekly_hours: dec(weekly),
            opening_balances: OpeningBalances::default(),
            scheduled_absences: vec![],
        }
    }

    #[test]
    fn test_full_year_capped_by_annual_ceiling() {
        // 2025 has 261 weekdays; one weekday holiday leaves 260 x 8 h = 2080 h.
        let config = create_test_config("1780");
        let e = employee(vec![period("2020-01-01", None, "40")]);

        let result = calculate_theoretical_hours(&e, 2025, &config).unwrap();
        assert_eq!(result.working_days, 260);
        assert_eq!(result.computed_hours, dec("2080"));
        assert_eq!(result.cap_hours, dec("1780"));
        assert_eq!(result.theoretical_hours, dec("1780"));
    }

    #[test]
    fn test_calendar_hours_below_ceiling() {
        let config = create_test_config("9999");
        let e = employee(vec![period("2020-01-01", None, "40")]);

        let result = calculate_theoretical_hours(&e, 2025, &config).unwrap();
        assert_eq!(result.theoretical_hours, dec("2080"));
    }

    #[test]
    fn test_part_time_prorates_ceiling() {
        let config = create_test_config("1780");
        let e = employee(vec![period("2020-01-01", None, "20")]);

        let result = calculate_theoretical_hours(&e, 2025, &config).unwrap();
        assert_eq!(result.cap_hours, dec("890"));
        assert_eq!(result.theoretical_hours, dec("890"));
    }

    #[test]
    fn test_partial_year_prorates_by_days() {
        let config = create_test_config("1780");
        // 1 July to 31 December 2025 = 184 days.
        let e = employee(vec![period("2025-07-01", None, "40")]);

        let result = calculate_theoretical_hours(&e, 2025, &config).unwrap();
        // 1780 x 184 / 365 = 897.32...
        assert_eq!(result.cap_hours, dec("897.32"));
        assert!(result.theoretical_hours <= result.cap_hours);
    }

    #[test]
    fn test_suspended_days_reduce_hours_and_ceiling() {
        let config = create_test_config("9999");
        let mut p = period("2020-01-01", None, "40");
        p.scheduled_absences.push(ScheduledAbsence {
            id: "a1".to_string(),
            absence_type_id: "excedencia".to_string(),
            start_date: d("2025-02-03"),
            end_date: Some(d("2025-02-09")),
        });
        let e = employee(vec![p]);

        let result = calculate_theoretical_hours(&e, 2025, &config).unwrap();
        // One suspended week removes 5 working days.
        assert_eq!(result.working_days, 255);
        assert_eq!(result.computed_hours, dec("2040"));
    }

    #[test]
    fn test_missing_annual_config_returns_error() {
        let config = create_test_config("1780");
        let e = employee(vec![period("2020-01-01", None, "40")]);

        assert!(matches!(
            calculate_theoretical_hours(&e, 2024, &config),
            Err(EngineError::AnnualConfigNotFound { year: 2024 })
        ));
    }

    #[test]
    fn test_not_employed_in_year_returns_zero_with_warning() {
        let config = create_test_config("1780");
        let e = employee(vec![period("2020-01-01", Some("2023-12-31"), "40")]);

        let result = calculate_theoretical_hours(&e, 2025, &config).unwrap();
        assert_eq!(result.theoretical_hours, Decimal::ZERO);
        assert_eq!(result.audit_trace.warnings[0].code, "NOT_EMPLOYED_IN_YEAR");
    }
}
