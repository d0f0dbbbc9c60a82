//! Day classification.
//!
//! This module decides what kind of day a date is for working-time purposes
//! (working weekday, weekend, holiday) and how many theoretical hours an
//! employment period owes on it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{HolidayType, HrConfig};
use crate::models::{EmploymentPeriod, is_weekend};

/// Number of working weekdays the weekly hours are spread over.
pub const WORKDAYS_PER_WEEK: u32 = 5;

/// The kind of a calendar day.
///
/// # Example
///
/// ```
/// use jornada_engine::calculation::DayKind;
/// use jornada_engine::config::HolidayType;
///
/// let kind = DayKind::Holiday(HolidayType::Apertura);
/// assert_eq!(kind.to_string(), "Holiday (Apertura)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// Monday to Friday, not a holiday.
    Workday,
    /// Saturday or Sunday, not a holiday.
    Weekend,
    /// A holiday of the given type, whatever the weekday.
    Holiday(HolidayType),
}

impl std::fmt::Display for DayKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayKind::Workday => write!(f, "Workday"),
            DayKind::Weekend => write!(f, "Weekend"),
            DayKind::Holiday(t) => write!(f, "Holiday ({})", t),
        }
    }
}

/// Classifies a date against the holiday calendar.
pub fn classify_day(date: NaiveDate, config: &HrConfig) -> DayKind {
    if let Some(holiday) = config.holiday_on(date) {
        DayKind::Holiday(holiday.holiday_type)
    } else if is_weekend(date) {
        DayKind::Weekend
    } else {
        DayKind::Workday
    }
}

/// Hours of one full working day of the period (`weekly_hours / 5`).
pub fn daily_hours(period: &EmploymentPeriod) -> Decimal {
    period.weekly_hours / Decimal::from(WORKDAYS_PER_WEEK)
}

/// Returns true if a scheduled absence that suspends the contract covers the date.
pub fn is_suspended(period: &EmploymentPeriod, date: NaiveDate, config: &HrConfig) -> bool {
    period.absences_on(date).any(|absence| {
        config
            .absence_types()
            .get(&absence.absence_type_id)
            .is_some_and(|t| t.suspends_contract)
    })
}

/// Theoretical hours the period owes on a date.
///
/// Working weekdays owe [`daily_hours`]; weekends, holidays and suspended
/// days owe nothing. The caller is responsible for checking the date lies
/// inside the period.
pub fn daily_theoretical_hours(
    period: &EmploymentPeriod,
    date: NaiveDate,
    config: &HrConfig,
) -> Decimal {
    if is_suspended(period, date, config) {
        return Decimal::ZERO;
    }
    match classify_day(date, config) {
        DayKind::Workday => daily_hours(period),
        DayKind::Weekend | DayKind::Holiday(_) => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AbsenceType, CompanyMetadata, Holiday};
    use crate::models::{OpeningBalances, ScheduledAbsence};
    use std::collections::HashMap;
    use std::str::FromStr;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_config() -> HrConfig {
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
            vec![],
            vec![
                Holiday {
                    id: "h1".to_string(),
                    name: "Año Nuevo".to_string(),
                    date: d("2025-01-01"),
                    holiday_type: HolidayType::Nacional,
                },
                Holiday {
                    id: "h2".to_string(),
                    name: "Apertura".to_string(),
                    date: d("2025-12-21"),
                    holiday_type: HolidayType::Apertura,
                },
            ],
            vec![],
        )
    }

    fn period(weekly: &str) -> EmploymentPeriod {
        EmploymentPeriod {
            id: "p1".to_string(),
            start_date: d("2024-01-01"),
            end_date: None,
            contract_type: "full_time".to_string(),
            weekly_hours: dec(weekly),
            opening_balances: OpeningBalances::default(),
            scheduled_absences: vec![],
        }
    }

    #[test]
    fn test_classify_weekday_weekend_holiday() {
        let config = create_test_config();
        assert_eq!(classify_day(d("2025-01-02"), &config), DayKind::Workday);
        assert_eq!(classify_day(d("2025-01-04"), &config), DayKind::Weekend);
        assert_eq!(
            classify_day(d("2025-01-01"), &config),
            DayKind::Holiday(HolidayType::Nacional)
        );
        // A holiday on a Sunday is still a holiday.
        assert_eq!(
            classify_day(d("2025-12-21"), &config),
            DayKind::Holiday(HolidayType::Apertura)
        );
    }

    #[test]
    fn test_daily_hours_full_and_part_time() {
        assert_eq!(daily_hours(&period("40")), dec("8"));
        assert_eq!(daily_hours(&period("37.5")), dec("7.5"));
        assert_eq!(daily_hours(&period("20")), dec("4"));
    }

    #[test]
    fn test_theoretical_hours_zero_on_weekend_and_holiday() {
        let config = create_test_config();
        let p = period("40");
        assert_eq!(daily_theoretical_hours(&p, d("2025-01-02"), &config), dec("8"));
        assert_eq!(daily_theoretical_hours(&p, d("2025-01-04"), &config), Decimal::ZERO);
        assert_eq!(daily_theoretical_hours(&p, d("2025-01-01"), &config), Decimal::ZERO);
    }

    #[test]
    fn test_suspended_day_owes_nothing() {
        let config = create_test_config();
        let mut p = period("40");
        p.scheduled_absences.push(ScheduledAbsence {
            id: "a1".to_string(),
            absence_type_id: "excedencia".to_string(),
            start_date: d("2025-03-01"),
            end_date: Some(d("2025-03-31")),
        });
        assert!(is_suspended(&p, d("2025-03-10"), &config));
        assert_eq!(daily_theoretical_hours(&p, d("2025-03-10"), &config), Decimal::ZERO);
        assert_eq!(daily_theoretical_hours(&p, d("2025-04-01"), &config), dec("8"));
    }

    #[test]
    fn test_unknown_absence_type_does_not_suspend() {
        let config = create_test_config();
        let mut p = period("40");
        p.scheduled_absences.push(ScheduledAbsence {
            id: "a1".to_string(),
            absence_type_id: "missing".to_string(),
            start_date: d("2025-03-01"),
            end_date: None,
        });
        assert!(!is_suspended(&p, d("2025-03-10"), &config));
    }
}
