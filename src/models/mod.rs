//! Core data models for the leave ledger.

mod employee;
mod page;

pub use employee::{Employee, EmployeeId, WorkingPattern};
pub use page::{Page, PageMeta, PageRequest};
