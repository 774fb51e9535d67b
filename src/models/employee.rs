//! Employee leave record and working pattern.
//!
//! The [`Employee`] record is the aggregate root of the ledger: it carries the
//! worked-day and accrued-leave counters of the current and prior leave-year,
//! the month cursor the ledger is positioned at, and the set of days already
//! taken as leave.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::policy::{ELIGIBILITY_MIN_DAYS_WORKED, is_public_holiday};

/// Identifier assigned to an employee record by storage.
pub type EmployeeId = u64;

/// The days of the week an employee would normally work.
///
/// A day outside the pattern is never charged as leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingPattern {
    /// Days of the week that are normally worked.
    pub working_days: Vec<Weekday>,
}

impl WorkingPattern {
    /// Monday to Saturday, with Sunday as the weekly rest day.
    pub fn six_day_week() -> Self {
        Self {
            working_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
                Weekday::Sat,
            ],
        }
    }

    /// Monday to Friday.
    pub fn five_day_week() -> Self {
        Self {
            working_days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }

    /// Returns true if `weekday` is normally worked.
    pub fn is_working_day(&self, weekday: Weekday) -> bool {
        self.working_days.contains(&weekday)
    }
}

impl Default for WorkingPattern {
    fn default() -> Self {
        Self::six_day_week()
    }
}

/// A home-care employee's paid-leave record.
///
/// # Example
///
/// ```
/// use conges_ledger::models::Employee;
/// use chrono::NaiveDate;
///
/// let employee = Employee::new(
///     "Jeannette Dupontelle",
///     NaiveDate::from_ymd_opt(2021, 7, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
/// );
/// assert!(employee.id.is_none());
/// assert!(!employee.is_entitled_to_paid_leave());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Storage-assigned identifier, absent until the record is first saved.
    #[serde(default)]
    pub id: Option<EmployeeId>,
    /// Display name.
    pub name: String,
    /// Month the contract started; only its year and month are meaningful.
    pub contract_start_month: NaiveDate,
    /// First day of the month the ledger is positioned at.
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
    /// Days taken as leave within the active leave-year window.
    #[serde(default)]
    pub leave_days_taken: BTreeSet<NaiveDate>,
    /// Weekly working pattern.
    #[serde(default)]
    pub working_pattern: WorkingPattern,
}

impl Employee {
    /// Creates a record with empty counters and the default working pattern.
    pub fn new(
        name: impl Into<String>,
        contract_start_month: NaiveDate,
        current_month: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            contract_start_month,
            current_month,
            days_worked_current_year: 0.0,
            days_worked_prior_year: 0.0,
            leave_accrued_current_year: 0.0,
            leave_accrued_prior_year: 0.0,
            leave_taken_prior_year: 0.0,
            leave_days_taken: BTreeSet::new(),
            working_pattern: WorkingPattern::default(),
        }
    }

    /// Returns true if the employee worked enough days in the prior
    /// leave-year to be legally entitled to paid leave.
    pub fn is_entitled_to_paid_leave(&self) -> bool {
        self.days_worked_prior_year > ELIGIBILITY_MIN_DAYS_WORKED
    }

    /// Returns the prior-year leave balance not yet consumed.
    pub fn remaining_prior_year_leave(&self) -> f64 {
        self.leave_accrued_prior_year - self.leave_taken_prior_year
    }

    /// Returns the days of `[first_day, last_day]` that would be charged as
    /// leave: days in the working pattern that are not public holidays.
    ///
    /// The range is inclusive; an inverted range yields no day.
    ///
    /// # Example
    ///
    /// ```
    /// use conges_ledger::models::{Employee, WorkingPattern};
    /// use chrono::NaiveDate;
    ///
    /// let mut employee = Employee::new(
    ///     "Ana",
    ///     NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
    /// );
    /// employee.working_pattern = WorkingPattern::five_day_week();
    ///
    /// // Friday 2024-07-12 to Tuesday 2024-07-16; Sunday 14 is also Bastille Day.
    /// let days = employee.chargeable_days(
    ///     NaiveDate::from_ymd_opt(2024, 7, 12).unwrap(),
    ///     NaiveDate::from_ymd_opt(2024, 7, 16).unwrap(),
    /// );
    /// assert_eq!(days.len(), 3);
    /// ```
    pub fn chargeable_days(&self, first_day: NaiveDate, last_day: NaiveDate) -> BTreeSet<NaiveDate> {
        self.chargeable_days_iter(first_day, last_day).collect()
    }

    /// Yields the chargeable days of `[first_day, last_day]` in ascending
    /// order without collecting them.
    pub fn chargeable_days_iter(
        &self,
        first_day: NaiveDate,
        last_day: NaiveDate,
    ) -> impl Iterator<Item = NaiveDate> + '_ {
        first_day
            .iter_days()
            .take_while(move |day| *day <= last_day)
            .filter(|day| {
                self.working_pattern.is_working_day(day.weekday())
                    && !is_public_holiday(*day)
            })
    }
}
