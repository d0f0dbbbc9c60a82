//! Error types for the Jornada Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the engine, the store and the services can report.

use thiserror::Error;

/// The main error type for the Jornada Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use jornada_engine::error::EngineError;
///
/// let error = EngineError::AnnualConfigNotFound { year: 2031 };
/// assert_eq!(error.to_string(), "No annual configuration for year 2031");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No employee exists with the given id or email.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The id (or email) that was looked up.
        id: String,
    },

    /// A catalog or store entity was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "holiday", "group").
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// The contract type referenced by an employment period does not exist.
    #[error("Contract type not found: {code}")]
    ContractTypeNotFound {
        /// The contract type code.
        code: String,
    },

    /// The absence type referenced by an absence does not exist.
    #[error("Absence type not found: {id}")]
    AbsenceTypeNotFound {
        /// The absence type id.
        id: String,
    },

    /// There is no annual configuration for the requested year.
    #[error("No annual configuration for year {year}")]
    AnnualConfigNotFound {
        /// The requested year.
        year: i32,
    },

    /// An employment period (or one of its absences) breaks a period rule.
    #[error("Invalid employment period '{period_id}': {message}")]
    InvalidEmploymentPeriod {
        /// The id of the offending period.
        period_id: String,
        /// A description of the rule that was broken.
        message: String,
    },

    /// A week id could not be parsed.
    #[error("Invalid week id '{value}': expected YYYY-Www")]
    InvalidWeekId {
        /// The rejected value.
        value: String,
    },

    /// Weekly record data was inconsistent.
    #[error("Invalid weekly record for week {week_id}: {message}")]
    InvalidWeeklyRecord {
        /// The week the record belongs to.
        week_id: String,
        /// A description of the problem.
        message: String,
    },

    /// The employee-week is confirmed and cannot be edited.
    #[error("Week {week_id} is already confirmed for employee {employee_id}")]
    WeekAlreadyConfirmed {
        /// The week id.
        week_id: String,
        /// The employee id.
        employee_id: String,
    },

    /// Generic input validation failure.
    #[error("Validation error on '{field}': {message}")]
    ValidationError {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Reading or writing the store snapshot failed.
    #[error("Storage error: {message}")]
    StorageError {
        /// A description of the storage failure.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::ValidationError`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
