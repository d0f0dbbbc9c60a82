//! Calculation logic for the Jornada Engine.
//!
//! This module contains the pure calculation functions: day classification,
//! employment-period rules, theoretical annual hours, the ordinary, holiday
//! and leave hour bags, and vacation accounting. Every function takes the
//! employee, the loaded [`HrConfig`](crate::config::HrConfig) and the
//! weekly records it needs, and returns a result carrying an audit trace.

mod balances;
mod day_kind;
mod periods;
mod theoretical_hours;
mod vacations;

pub use balances::{DayOutcome, evaluate_day, get_final_balances};
pub use day_kind::{
    DayKind, WORKDAYS_PER_WEEK, classify_day, daily_hours, daily_theoretical_hours, is_suspended,
};
pub use periods::{MAX_WEEKLY_HOURS, find_active_period, validate_employment_periods};
pub use theoretical_hours::calculate_theoretical_hours;
pub use vacations::{calculate_employee_vacations, round_half_day};
