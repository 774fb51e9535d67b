//! HTTP API for the leave ledger.
//!
//! This module exposes employee record administration, leave requests,
//! month closes and company limit lookups as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CloseMonthRequest, EmployeeRequest, LeaveRequest, LimitParams, ListParams};
pub use response::{ApiError, ApiErrorResponse, CountResponse};
pub use state::AppState;
