//! Request types for the leave ledger API.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Employee, EmployeeId, PageRequest, WorkingPattern};

/// Request body for creating or replacing an employee record.
///
/// Counters default to zero and the working pattern to a six-day week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Must be absent on creation; on replacement it must match the path.
    #[serde(default)]
    pub id: Option<EmployeeId>,
    /// Display name.
    pub name: String,
    /// Month the contract started.
    pub contract_start_month: NaiveDate,
    /// Month the ledger is positioned at.
    pub current_month: NaiveDate,
    /// Days worked so far in the current leave-year.
    #[serde(default)]
    pub days_worked_current_year: f64,
    /// Days worked in the prior leave-year.
    #[serde(default)]
    pub days_worked_prior_year: f64,
    /// Leave days accrued so far in the current leave-year.
    #[serde(default)]
    pub leave_accrued_current_year: f64,
    /// Leave days accrued in the prior leave-year.
    #[serde(default)]
    pub leave_accrued_prior_year: f64,
    /// Leave days charged against the prior-year balance.
    #[serde(default)]
    pub leave_taken_prior_year: f64,
    /// Days already taken as leave.
    #[serde(default)]
    pub leave_days_taken: BTreeSet<NaiveDate>,
    /// Weekly working pattern.
    #[serde(default)]
    pub working_pattern: Option<WorkingPattern>,
}

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee {
            id: req.id,
            name: req.name,
            contract_start_month: req.contract_start_month,
            current_month: req.current_month,
            days_worked_current_year: req.days_worked_current_year,
            days_worked_prior_year: req.days_worked_prior_year,
            leave_accrued_current_year: req.leave_accrued_current_year,
            leave_accrued_prior_year: req.leave_accrued_prior_year,
            leave_taken_prior_year: req.leave_taken_prior_year,
            leave_days_taken: req.leave_days_taken,
            working_pattern: req.working_pattern.unwrap_or_default(),
        }
    }
}

/// Request body for `POST /employees/:id/leave`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// First day of the requested range.
    pub first_day: NaiveDate,
    /// Last day of the requested range, inclusive.
    pub last_day: NaiveDate,
}

/// Request body for `POST /employees/:id/close-month`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CloseMonthRequest {
    /// Days worked during the month being closed.
    pub days_worked: f64,
}

/// Query parameters for `GET /employees`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListParams {
    /// Restrict the listing to records with exactly this name.
    pub name: Option<String>,
    /// Page number, starting at 1.
    pub page: Option<u32>,
    /// Records per page.
    pub per_page: Option<u32>,
}

impl ListParams {
    /// Builds the page request, falling back to `default_page_size`.
    pub fn page_request(&self, default_page_size: u32) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(default_page_size),
        )
    }
}

/// Query parameters for `GET /employees/:id/company-limit`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimitParams {
    /// First day of the prospective leave range.
    pub first_day: NaiveDate,
    /// Last day of the prospective leave range.
    pub last_day: NaiveDate,
}
