//! Employee model and related types.
//!
//! This module defines the Employee struct together with its employment
//! periods and the absences scheduled inside them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DateRange;

/// The role an employee profile grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Administrator with access to every employee.
    Admin,
    /// Regular employee.
    #[default]
    Employee,
}

/// Hours brought into the bags when an employment period starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpeningBalances {
    /// Opening ordinary-hours balance.
    #[serde(default)]
    pub ordinary: Decimal,
    /// Opening holiday-hours balance.
    #[serde(default)]
    pub holiday: Decimal,
    /// Opening leave (days off) balance, in hours.
    #[serde(default)]
    pub leave: Decimal,
}

/// An absence planned ahead inside an employment period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAbsence {
    /// Unique identifier.
    pub id: String,
    /// The absence type id.
    pub absence_type_id: String,
    /// First day of the absence.
    pub start_date: NaiveDate,
    /// Last day of the absence, `None` when open-ended.
    pub end_date: Option<NaiveDate>,
}

impl ScheduledAbsence {
    /// Returns true if the absence covers the date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.is_none_or(|end| date <= end)
    }

    /// The days of the absence that fall inside `window`.
    pub fn range_within(&self, window: &DateRange) -> Option<DateRange> {
        DateRange::open_ended(self.start_date, self.end_date, window.end)?.intersect(window)
    }
}

/// A contract an employee held (or holds) with the company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmploymentPeriod {
    /// Unique identifier.
    pub id: String,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period, `None` while active.
    pub end_date: Option<NaiveDate>,
    /// The contract type code.
    pub contract_type: String,
    /// Contracted hours per week.
    pub weekly_hours: Decimal,
    /// Balances carried into the bags when the period starts.
    #[serde(default)]
    pub opening_balances: OpeningBalances,
    /// Absences planned inside this period.
    #[serde(default)]
    pub scheduled_absences: Vec<ScheduledAbsence>,
}

impl EmploymentPeriod {
    /// Returns true if the period counts as active on `today`.
    ///
    /// A period is active when it has no end date or ends on or after
    /// `today`.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.end_date.is_none_or(|end| end >= today)
    }

    /// Returns true if the date lies inside the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.is_none_or(|end| date <= end)
    }

    /// The whole period; an open end runs to the last representable date.
    pub fn span(&self) -> Option<DateRange> {
        DateRange::open_ended(self.start_date, self.end_date, NaiveDate::MAX)
    }

    /// The days of the period that fall inside `window`.
    pub fn range_within(&self, window: &DateRange) -> Option<DateRange> {
        DateRange::open_ended(self.start_date, self.end_date, window.end)?.intersect(window)
    }

    /// Returns the scheduled absences covering a date.
    pub fn absences_on(&self, date: NaiveDate) -> impl Iterator<Item = &ScheduledAbsence> {
        self.scheduled_absences
            .iter()
            .filter(move |absence| absence.covers(date))
    }
}

/// Represents an employee tracked by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Email used to resolve the session role.
    pub email: String,
    /// The group the employee belongs to.
    #[serde(default)]
    pub group_id: Option<String>,
    /// The role this profile grants.
    #[serde(default)]
    pub role: Role,
    /// Employment periods, ordered by start date.
    #[serde(default)]
    pub employment_periods: Vec<EmploymentPeriod>,
}

impl Employee {
    /// Returns the employment period that contains `date`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use jornada_engine::models::{Employee, EmploymentPeriod, Role};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "Lucía Pérez".to_string(),
    ///     email: "lucia@example.com".to_string(),
    ///     group_id: None,
    ///     role: Role::Employee,
    ///     employment_periods: vec![EmploymentPeriod {
    ///         id: "p1".to_string(),
    ///         start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    ///         end_date: None,
    ///         contract_type: "full_time".to_string(),
    ///         weekly_hours: Decimal::new(40, 0),
    ///         opening_balances: Default::default(),
    ///         scheduled_absences: vec![],
    ///     }],
    /// };
    /// assert!(employee.period_on(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()).is_some());
    /// assert!(employee.period_on(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()).is_none());
    /// ```
    pub fn period_on(&self, date: NaiveDate) -> Option<&EmploymentPeriod> {
        self.employment_periods.iter().find(|p| p.contains(date))
    }

    /// Returns true if the employee has a period overlapping `window`.
    pub fn is_employed_within(&self, window: &DateRange) -> bool {
        self.employment_periods
            .iter()
            .any(|p| p.range_within(window).is_some())
    }

    /// Sorts the employment periods by start date.
    pub fn sort_periods(&mut self) {
        self.employment_periods
            .sort_by(|a, b| a.start_date.cmp(&b.start_date));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn period(id: &str, start: &str, end: Option<&str>) -> EmploymentPeriod {
        EmploymentPeriod {
            id: id.to_string(),
            start_date: d(start),
            end_date: end.map(d),
            contract_type: "full_time".to_string(),
            weekly_hours: Decimal::new(40, 0),
            opening_balances: OpeningBalances::default(),
            scheduled_absences: vec![],
        }
    }

    #[test]
    fn test_deserialize_employee_with_defaults() {
        let json = r#"{
            "id": "emp_001",
            "name": "Lucía Pérez",
            "email": "lucia@example.com",
            "employment_periods": [{
                "id": "p1",
                "start_date": "2024-03-01",
                "end_date": null,
                "contract_type": "full_time",
                "weekly_hours": "40"
            }]
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.role, Role::Employee);
        assert_eq!(employee.group_id, None);
        let period = &employee.employment_periods[0];
        assert_eq!(period.weekly_hours, Decimal::new(40, 0));
        assert_eq!(period.opening_balances, OpeningBalances::default());
        assert!(period.scheduled_absences.is_empty());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&Role::Employee).unwrap(),
            "\"employee\""
        );
    }

    #[test]
    fn test_period_active_without_end_date() {
        let p = period("p1", "2024-01-01", None);
        assert!(p.is_active(d("2030-01-01")));
    }

    #[test]
    fn test_period_active_until_end_date() {
        let p = period("p1", "2024-01-01", Some("2025-06-30"));
        assert!(p.is_active(d("2025-06-30")));
        assert!(!p.is_active(d("2025-07-01")));
    }

    #[test]
    fn test_period_range_within_year() {
        let p = period("p1", "2024-10-01", Some("2025-03-31"));
        let year = DateRange::year(2025).unwrap();
        let range = p.range_within(&year).unwrap();
        assert_eq!(range.start, d("2025-01-01"));
        assert_eq!(range.end, d("2025-03-31"));

        let later = DateRange::year(2026).unwrap();
        assert!(p.range_within(&later).is_none());
    }

    #[test]
    fn test_open_ended_absence_covers_future_dates() {
        let absence = ScheduledAbsence {
            id: "a1".to_string(),
            absence_type_id: "baja_it".to_string(),
            start_date: d("2025-05-10"),
            end_date: None,
        };
        assert!(absence.covers(d("2027-01-01")));
        assert!(!absence.covers(d("2025-05-09")));

        let window = DateRange::year(2025).unwrap();
        let range = absence.range_within(&window).unwrap();
        assert_eq!(range.end, d("2025-12-31"));
    }

    #[test]
    fn test_period_on_picks_containing_period() {
        let employee = Employee {
            id: "emp_001".to_string(),
            name: "Test".to_string(),
            email: "t@example.com".to_string(),
            group_id: None,
            role: Role::Employee,
            employment_periods: vec![
                period("p1", "2023-01-01", Some("2023-12-31")),
                period("p2", "2024-02-01", None),
            ],
        };
        assert_eq!(employee.period_on(d("2023-06-01")).unwrap().id, "p1");
        assert_eq!(employee.period_on(d("2025-06-01")).unwrap().id, "p2");
        assert!(employee.period_on(d("2024-01-15")).is_none());
    }
}
