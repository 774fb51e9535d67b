//! The leave ledger engine.
//!
//! [`LeaveLedger`] validates and records leave requests, closes months and
//! leave-years, and administers employee records on top of an
//! [`EmployeeRepository`](crate::storage::EmployeeRepository).

mod engine;
mod records;

pub use engine::{LeaveGrant, LeaveLedger, MonthClose};
