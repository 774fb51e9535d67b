//! Response types for the leave ledger API.
//!
//! This module defines the error body and the mapping from [`LedgerError`]
//! to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, LedgerError};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<LedgerError> for ApiErrorResponse {
    fn from(error: LedgerError) -> Self {
        let code = match &error {
            LedgerError::IdentityProvided => "IDENTITY_PROVIDED",
            LedgerError::IdentityMissing => "IDENTITY_MISSING",
            LedgerError::EmployeeNotFound { .. } => "EMPLOYEE_NOT_FOUND",
            LedgerError::IneligibleEmployee => "INELIGIBLE_EMPLOYEE",
            LedgerError::NoLeaveNeeded => "NO_LEAVE_NEEDED",
            LedgerError::LeaveBeforeCurrentMonth { .. } => "LEAVE_BEFORE_CURRENT_MONTH",
            LedgerError::SpansTooFarForward { .. } => "SPANS_TOO_FAR_FORWARD",
            LedgerError::ExceedsAccruedBalance { .. } => "EXCEEDS_ACCRUED_BALANCE",
            LedgerError::ExceedsCompanyLimit { .. } => "EXCEEDS_COMPANY_LIMIT",
            LedgerError::Storage(_) => "STORAGE_ERROR",
            LedgerError::ConfigNotFound { .. } | LedgerError::ConfigParseError { .. } => {
                "CONFIG_ERROR"
            }
            LedgerError::CalculationError { .. } => "CALCULATION_ERROR",
        };

        let status = match error.kind() {
            ErrorKind::Precondition if matches!(error, LedgerError::EmployeeNotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            ErrorKind::Precondition => StatusCode::BAD_REQUEST,
            ErrorKind::Policy => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Storage | ErrorKind::Config | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let error = match error.kind() {
            ErrorKind::Policy => ApiError::with_details(
                code,
                error.to_string(),
                "The leave policy rejected the request; the record is unchanged",
            ),
            _ => ApiError::new(code, error.to_string()),
        };

        ApiErrorResponse { status, error }
    }
}

/// Response body for `GET /employees/count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    /// Number of employee records.
    pub count: u64,
}
