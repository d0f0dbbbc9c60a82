//! Weekly schedule records.
//!
//! A [`WeeklyRecord`] holds, for one ISO week, the hours and absences each
//! employee logged per day and whether an administrator has confirmed them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

use super::DateRange;

/// An ISO-8601 week, written `YYYY-Www`.
///
/// # Example
///
/// ```
/// use jornada_engine::models::WeekId;
/// use chrono::NaiveDate;
///
/// let week: WeekId = "2025-W01".parse().unwrap();
/// // ISO week 1 of 2025 starts on Monday 30 December 2024.
/// assert_eq!(week.monday(), NaiveDate::from_ymd_opt(2024, 12, 30).unwrap());
/// assert_eq!(week.to_string(), "2025-W01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekId {
    year: i32,
    week: u32,
}

impl WeekId {
    /// Creates a week id if the ISO year has that week and all seven of its
    /// days are representable.
    pub fn new(year: i32, week: u32) -> Option<Self> {
        NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
        NaiveDate::from_isoywd_opt(year, week, Weekday::Sun)?;
        Some(Self { year, week })
    }

    /// The ISO week a date belongs to.
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// The ISO year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The week number within the ISO year.
    pub fn week(&self) -> u32 {
        self.week
    }

    /// The Monday the week starts on.
    pub fn monday(&self) -> NaiveDate {
        // Constructors guarantee the week exists.
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon).unwrap_or_default()
    }

    /// Monday to Sunday of the week, cut short at the last representable
    /// date.
    pub fn range(&self) -> DateRange {
        let monday = self.monday();
        DateRange {
            start: monday,
            end: monday
                .checked_add_days(chrono::Days::new(6))
                .unwrap_or(NaiveDate::MAX),
        }
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidWeekId {
            value: s.to_string(),
        };
        let (year, week) = s.trim().split_once("-W").ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;
        Self::new(year, week).ok_or_else(invalid)
    }
}

impl TryFrom<String> for WeekId {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekId> for String {
    fn from(week: WeekId) -> Self {
        week.to_string()
    }
}

/// What an employee logged on one day.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyData {
    /// Hours worked.
    #[serde(default)]
    pub worked_hours: Decimal,
    /// Absence recorded on the day, if any.
    #[serde(default)]
    pub absence_type_id: Option<String>,
    /// Hours of a splittable absence; ignored for whole-day absences.
    #[serde(default)]
    pub absence_hours: Decimal,
    /// Hours taken off against the leave bag.
    #[serde(default)]
    pub leave_hours_taken: Decimal,
    /// Hours taken off against the holiday bag.
    #[serde(default)]
    pub holiday_hours_taken: Decimal,
}

/// One employee's week.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmployeeWeek {
    /// Logged data keyed by date.
    #[serde(default)]
    pub days: BTreeMap<NaiveDate, DailyData>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Whether an administrator confirmed the week.
    #[serde(default)]
    pub confirmed: bool,
    /// When the week was confirmed.
    #[serde(default)]
    pub confirmed_at: Option<DateTime<Utc>>,
    /// Who confirmed the week.
    #[serde(default)]
    pub confirmed_by: Option<String>,
}

impl EmployeeWeek {
    /// The data logged on a date, or an empty day.
    pub fn day(&self, date: NaiveDate) -> DailyData {
        self.days.get(&date).cloned().unwrap_or_default()
    }
}

/// All employee data logged for one ISO week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRecord {
    /// The week.
    pub week_id: WeekId,
    /// Per-employee data keyed by employee id.
    #[serde(default)]
    pub employees: BTreeMap<String, EmployeeWeek>,
}

impl WeeklyRecord {
    /// Creates an empty record for a week.
    pub fn new(week_id: WeekId) -> Self {
        Self {
            week_id,
            employees: BTreeMap::new(),
        }
    }

    /// Returns the employee's week if it is confirmed.
    pub fn confirmed_week(&self, employee_id: &str) -> Option<&EmployeeWeek> {
        self.employees.get(employee_id).filter(|w| w.confirmed)
    }

    /// Returns true if the employee's week exists and is confirmed.
    pub fn is_confirmed_for(&self, employee_id: &str) -> bool {
        self.confirmed_week(employee_id).is_some()
    }
}
