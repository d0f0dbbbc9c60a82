//! Inclusive date ranges.
//!
//! Employment periods and absences are both "start date plus optional end
//! date"; [`DateRange`] is the closed interval they resolve to once an open
//! end has been clipped.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A closed range of dates, `start..=end`.
///
/// # Example
///
/// ```
/// use jornada_engine::models::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange::new(
///     NaiveDate::from_ymd_opt(2025, 1, 30).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 2, 2).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(range.iter_days().count(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range.
    pub start: NaiveDate,
    /// Last day of the range (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, or `None` if `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (end >= start).then_some(Self { start, end })
    }

    /// The whole calendar year.
    pub fn year(year: i32) -> Option<Self> {
        Self::new(
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        )
    }

    /// Resolves an optional end date, clipping the range to end by `horizon`.
    ///
    /// Returns `None` when the range starts after the horizon.
    pub fn open_ended(start: NaiveDate, end: Option<NaiveDate>, horizon: NaiveDate) -> Option<Self> {
        Self::new(start, end.map_or(horizon, |e| e.min(horizon)))
    }

    /// Returns true if the date lies inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The overlap with another range, if any.
    pub fn intersect(&self, other: &DateRange) -> Option<DateRange> {
        Self::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Returns true if both ranges share at least one day.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.intersect(other).is_some()
    }

    /// Iterates over every date of the range.
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Number of days in a calendar year.
pub fn days_in_year(year: i32) -> i64 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

/// Returns true if the date falls on Saturday or Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    date.weekday().number_from_monday() > 5
}
