//! Calculation result models for the Jornada Engine.
//!
//! This module contains the result types returned by the engine (hour-bag
//! reports, vacation summaries, theoretical annual hours) and the audit
//! trace every one of them carries.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::WeekId;

/// The hour bags an employee accrues.
///
/// # Example
///
/// ```
/// use jornada_engine::models::BagKind;
///
/// assert_eq!(serde_json::to_string(&BagKind::Leave).unwrap(), "\"leave\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BagKind {
    /// Ordinary hours: worked plus covered minus theoretical.
    Ordinary,
    /// Hours worked on holidays.
    Holiday,
    /// Compensatory days off, in hours.
    Leave,
}

impl std::fmt::Display for BagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BagKind::Ordinary => write!(f, "ordinary"),
            BagKind::Holiday => write!(f, "holiday"),
            BagKind::Leave => write!(f, "leave"),
        }
    }
}

/// The net change of one bag during one confirmed week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagMovement {
    /// The week the movement comes from.
    pub week_id: WeekId,
    /// The bag that moved.
    pub bag: BagKind,
    /// Net hours (negative when the bag was drawn down).
    pub hours: Decimal,
}

/// Balances of every bag plus their total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FinalBalances {
    /// Ordinary-hours bag.
    pub ordinary: Decimal,
    /// Holiday-hours bag.
    pub holiday: Decimal,
    /// Leave bag.
    pub leave: Decimal,
    /// Sum of the three bags.
    pub total: Decimal,
}

impl FinalBalances {
    /// Builds balances from the three bags, computing the total.
    ///
    /// # Example
    ///
    /// ```
    /// use jornada_engine::models::FinalBalances;
    /// use rust_decimal::Decimal;
    ///
    /// let balances = FinalBalances::from_bags(Decimal::new(5, 0), Decimal::new(8, 0), Decimal::ZERO);
    /// assert_eq!(balances.total, Decimal::new(13, 0));
    /// ```
    pub fn from_bags(ordinary: Decimal, holiday: Decimal, leave: Decimal) -> Self {
        Self {
            ordinary,
            holiday,
            leave,
            total: ordinary + holiday + leave,
        }
    }

    /// Returns the value of one bag.
    pub fn bag(&self, bag: BagKind) -> Decimal {
        match bag {
            BagKind::Ordinary => self.ordinary,
            BagKind::Holiday => self.holiday,
            BagKind::Leave => self.leave,
        }
    }

    /// Adds hours to one bag, keeping the total in step.
    pub fn add(&mut self, bag: BagKind, hours: Decimal) {
        match bag {
            BagKind::Ordinary => self.ordinary += hours,
            BagKind::Holiday => self.holiday += hours,
            BagKind::Leave => self.leave += hours,
        }
        self.total += hours;
    }

    /// Rounds every figure to two decimal places.
    pub fn rounded(&self) -> Self {
        Self::from_bags(
            round_hours(self.ordinary),
            round_hours(self.holiday),
            round_hours(self.leave),
        )
    }
}

/// Rounds hours to two decimal places, midpoint away from zero.
pub fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use jornada_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Appends a step, numbering it after the existing ones.
    pub fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.steps.len() as u32 + 1;
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning,
        });
    }

    /// Appends a warning.
    pub fn warn(&mut self, code: &str, message: String, severity: &str) {
        self.warnings.push(AuditWarning {
            code: code.to_string(),
            message,
            severity: severity.to_string(),
        });
    }
}

/// The hour-bag report for an employee as of the end of a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReport {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that produced it.
    pub engine_version: String,
    /// The employee.
    pub employee_id: String,
    /// The year the report closes.
    pub year: i32,
    /// Balances at 31 December of the previous year (opening balances included).
    pub carried_over: FinalBalances,
    /// Weekly movements dated within the year.
    pub movements: Vec<BagMovement>,
    /// Balances at 31 December of the year.
    pub balances: FinalBalances,
    /// Audit trace.
    pub audit_trace: AuditTrace,
}

/// Where a vacation day was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VacationSource {
    /// A scheduled absence.
    Scheduled,
    /// A weekly record entry.
    WeeklyRecord,
}

/// One day (or fraction of a day) of vacation taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationDay {
    /// The date.
    pub date: NaiveDate,
    /// Fraction of a day consumed (1 for a whole day).
    pub fraction: Decimal,
    /// Where it was taken from.
    pub source: VacationSource,
}

/// Vacation allowance and consumption for an employee in a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationSummary {
    /// The employee.
    pub employee_id: String,
    /// The year.
    pub year: i32,
    /// Days accrued for the year.
    pub days_available: Decimal,
    /// Days consumed.
    pub days_taken: Decimal,
    /// Available minus taken; negative when overdrawn.
    pub days_remaining: Decimal,
    /// The consumed days, by date.
    pub taken: Vec<VacationDay>,
    /// Audit trace.
    pub audit_trace: AuditTrace,
}

/// Theoretical annual hours of an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoreticalHoursResult {
    /// The employee.
    pub employee_id: String,
    /// The year.
    pub year: i32,
    /// Hours from the calendar: daily theoretical hours summed.
    pub computed_hours: Decimal,
    /// The prorated annual ceiling.
    pub cap_hours: Decimal,
    /// The lower of the two.
    pub theoretical_hours: Decimal,
    /// Working days counted.
    pub working_days: u32,
    /// Audit trace.
    pub audit_trace: AuditTrace,
}
