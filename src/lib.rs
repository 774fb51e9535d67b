//! Paid-leave ledger for home-care employees
//!
//! This crate keeps each employee's accrued and taken paid leave ("congés
//! payés") across June-to-May leave-years, validates leave requests against
//! legal eligibility and a company limit, and rolls the counters forward as
//! months and leave-years close.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod policy;
pub mod storage;
