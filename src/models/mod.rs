//! Core data models for the Jornada Engine.
//!
//! This module contains the domain models shared by the engine, the store
//! and the API.

mod calculation_result;
mod conversation;
mod date_range;
mod employee;
mod weekly_record;

pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, BagKind, BagMovement, BalanceReport, FinalBalances,
    TheoreticalHoursResult, VacationDay, VacationSource, VacationSummary, round_hours,
};
pub use conversation::{Conversation, Message, Sender};
pub use date_range::{DateRange, days_in_year, is_weekend};
pub use employee::{Employee, EmploymentPeriod, OpeningBalances, Role, ScheduledAbsence};
pub use weekly_record::{DailyData, EmployeeWeek, WeekId, WeeklyRecord};
