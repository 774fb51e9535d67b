//! Error types for the leave ledger.
//!
//! Every failure the ledger can report is a [`LedgerError`]. Variants are
//! grouped by [`ErrorKind`] so callers can tell a caller mistake from a
//! policy rejection or a storage failure without matching every variant.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::EmployeeId;

/// Failures raised by a storage collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The lock guarding the record store was poisoned by a panicking writer.
    #[error("Employee store lock poisoned")]
    LockPoisoned,
}

/// Broad classification of a [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller broke an operation contract (identity rules, unknown record).
    Precondition,
    /// A leave or period rule rejected the operation.
    Policy,
    /// The storage collaborator failed.
    Storage,
    /// Configuration could not be loaded.
    Config,
    /// An arithmetic or date computation could not be completed.
    Internal,
}

/// The main error type for the leave ledger.
///
/// # Example
///
/// ```
/// use conges_ledger::error::{ErrorKind, LedgerError};
///
/// let error = LedgerError::IdentityProvided;
/// assert_eq!(error.kind(), ErrorKind::Precondition);
/// assert_eq!(error.to_string(), "Employee id must not be supplied: it is assigned by storage");
/// ```
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A record submitted for creation already carries an id.
    #[error("Employee id must not be supplied: it is assigned by storage")]
    IdentityProvided,

    /// A record submitted for update has no id.
    #[error("Employee id must be supplied")]
    IdentityMissing,

    /// No record exists for the given id.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The id that was looked up.
        id: EmployeeId,
    },

    /// The employee has not worked enough in the prior leave-year to be
    /// legally entitled to paid leave.
    #[error("Employee is not legally entitled to paid leave")]
    IneligibleEmployee,

    /// The requested range contains no chargeable day.
    #[error("No leave needed: the requested range contains no chargeable day")]
    NoLeaveNeeded,

    /// The first chargeable day precedes the employee's current month.
    #[error("Leave cannot start on {first_day}, before the current month {current_month}")]
    LeaveBeforeCurrentMonth {
        /// The earliest chargeable day of the request.
        first_day: NaiveDate,
        /// The employee's current month cursor.
        current_month: NaiveDate,
    },

    /// More than one chargeable day falls in the next leave-year.
    #[error("Leave cannot extend into the next leave-year (after {year_end}) beyond its first day")]
    SpansTooFarForward {
        /// The last day of the current leave-year.
        year_end: NaiveDate,
    },

    /// The chargeable days exceed what remains of the prior-year balance.
    #[error("Chargeable leave days ({requested}) exceed the remaining prior-year balance: {remaining}")]
    ExceedsAccruedBalance {
        /// Chargeable days in the current leave-year.
        requested: usize,
        /// Accrued prior-year days not yet consumed.
        remaining: f64,
    },

    /// The request failed the company limit check.
    #[error("Chargeable leave days ({requested}) fail the company limit: {limit}")]
    ExceedsCompanyLimit {
        /// Chargeable days in the current leave-year.
        requested: usize,
        /// The computed company limit.
        limit: i64,
    },

    /// The storage collaborator failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

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

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

impl LedgerError {
    /// Returns the broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::IdentityProvided
            | LedgerError::IdentityMissing
            | LedgerError::EmployeeNotFound { .. } => ErrorKind::Precondition,
            LedgerError::IneligibleEmployee
            | LedgerError::NoLeaveNeeded
            | LedgerError::LeaveBeforeCurrentMonth { .. }
            | LedgerError::SpansTooFarForward { .. }
            | LedgerError::ExceedsAccruedBalance { .. }
            | LedgerError::ExceedsCompanyLimit { .. } => ErrorKind::Policy,
            LedgerError::Storage(_) => ErrorKind::Storage,
            LedgerError::ConfigNotFound { .. } | LedgerError::ConfigParseError { .. } => {
                ErrorKind::Config
            }
            LedgerError::CalculationError { .. } => ErrorKind::Internal,
        }
    }
}

/// A type alias for Results that return LedgerError.
pub type LedgerResult<T> = Result<T, LedgerError>;
