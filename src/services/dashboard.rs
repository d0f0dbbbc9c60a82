//! Administrative dashboard summary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::Holiday;
use crate::models::WeekId;
use crate::store::Store;

use super::employees::sorted_employees;

/// Number of upcoming holidays shown.
pub const UPCOMING_HOLIDAYS: usize = 3;

/// An employee away on the dashboard date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsentEmployee {
    /// The employee.
    pub employee_id: String,
    /// Their name.
    pub name: String,
    /// The scheduled absence type.
    pub absence_type_id: String,
}

/// An employee whose current week still awaits confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingWeek {
    /// The employee.
    pub employee_id: String,
    /// Their name.
    pub name: String,
    /// The unconfirmed week.
    pub week_id: WeekId,
}

/// The dashboard figures for a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// The date the summary is for.
    pub date: NaiveDate,
    /// Employees with an employment period covering the date.
    pub active_employees: usize,
    /// Employees on a scheduled absence.
    pub absent: Vec<AbsentEmployee>,
    /// Active employees whose week is not confirmed.
    pub pending_weeks: Vec<PendingWeek>,
    /// Conversations with messages the admin has not read.
    pub unread_conversations: usize,
    /// The next holidays on or after the date.
    pub upcoming_holidays: Vec<Holiday>,
}

/// Builds the dashboard summary for `date`.
pub async fn dashboard_summary(store: &Store, date: NaiveDate) -> DashboardSummary {
    let data = store.read().await;
    let week_id = WeekId::from_date(date);
    let record = data.weekly_records.get(&week_id);

    let mut active_employees = 0;
    let mut absent = Vec::new();
    let mut pending_weeks = Vec::new();

    for employee in sorted_employees(&data) {
        let Some(period) = employee.period_on(date) else {
            continue;
        };
        active_employees += 1;

        if let Some(absence) = period.absences_on(date).next() {
            absent.push(AbsentEmployee {
                employee_id: employee.id.clone(),
                name: employee.name.clone(),
                absence_type_id: absence.absence_type_id.clone(),
            });
        }
        if !record.is_some_and(|r| r.is_confirmed_for(&employee.id)) {
            pending_weeks.push(PendingWeek {
                employee_id: employee.id.clone(),
                name: employee.name.clone(),
                week_id,
            });
        }
    }

    let unread_conversations = data
        .conversations
        .values()
        .filter(|c| c.unread_by_admin)
        .count();

    let upcoming_holidays = data
        .config
        .holidays()
        .iter()
        .filter(|h| h.date >= date)
        .take(UPCOMING_HOLIDAYS)
        .cloned()
        .collect();

    DashboardSummary {
        date,
        active_employees,
        absent,
        pending_weeks,
        unread_conversations,
        upcoming_holidays,
    }
}
