//! Error types for the Payslip Engine.
//!
//! The derivation functions themselves are total and never fail.
//! Errors only arise at the edges: loading policy files, reading the
//! process configuration, and checking a draft before submission.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to load a payroll policy file.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse policy file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid policy: {0}")]
    Invalid(String),
}

/// Failure to read the process configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{var}` is not a valid socket address: {value}")]
    InvalidAddress { var: &'static str, value: String },
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// A draft that cannot be submitted as it stands.
///
/// Negative net pay is deliberately absent: it is shown to the user
/// but does not block submission.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    #[error("no employee selected")]
    MissingEmployee,
    #[error("month {0} is outside 1..=12")]
    InvalidMonth(u32),
    #[error("days worked ({days_worked}) exceed working days ({working_days})")]
    DaysWorkedExceedWorkingDays { days_worked: u32, working_days: u32 },
    #[error("overtime multiplier must be positive, got {0}")]
    InvalidOvertimeMultiplier(f64),
}
