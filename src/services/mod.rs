//! Application services.
//!
//! Each service takes the shared [`Store`](crate::store::Store), validates its
//! input, applies the change through a single store mutation and logs the
//! outcome. The HTTP handlers are thin wrappers around these functions.

mod catalog;
mod dashboard;
mod employees;
mod messaging;
mod records;
mod reports;
mod session;

pub use catalog::{
    delete_absence_type, delete_contract_type, delete_group, delete_holiday, list_absence_types,
    list_annual_configurations, list_contract_types, list_groups, list_holidays,
    upsert_absence_type, upsert_annual_configuration, upsert_contract_type, upsert_group,
    upsert_holiday,
};
pub use dashboard::{AbsentEmployee, DashboardSummary, PendingWeek, UPCOMING_HOLIDAYS, dashboard_summary};
pub use employees::{create_employee, delete_employee, get_employee, list_employees, update_employee};
pub use messaging::{
    MAX_MESSAGE_CHARS, get_conversation, list_conversations, mark_read, post_message,
};
pub use records::{
    confirm_employee_week, confirm_week, get_week, reopen_employee_week, upsert_employee_week,
};
pub use reports::{
    AnnualReport, AnnualReportRow, annual_report, employee_balances, employee_theoretical_hours,
    employee_vacations,
};
pub use session::{Session, resolve_session};
