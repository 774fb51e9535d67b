//! Leave granting and period closing.
//!
//! Every operation works on a copy of the employee record and only replaces
//! the caller's record once storage has accepted the new state, so a
//! rejected request leaves the record untouched.

use std::collections::BTreeSet;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::models::Employee;
use crate::policy::{
    CompanyLimit, LEAVE_YEAR_START_MONTH, LimitInputs, MONTHLY_ACCRUAL, company_limit,
    leave_year_end, leave_year_start,
};
use crate::storage::EmployeeRepository;

/// Outcome of a granted leave request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveGrant {
    /// Chargeable days recorded as taken.
    pub days: BTreeSet<NaiveDate>,
    /// Number of those days falling in the current leave-year.
    pub current_year_days: usize,
    /// The company limit the request was checked against.
    pub company_limit: CompanyLimit,
}

/// Outcome of a month close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthClose {
    /// The employee's month cursor after the close.
    pub current_month: NaiveDate,
    /// Whether the close also closed the leave-year.
    pub year_closed: bool,
}

/// The leave ledger engine.
///
/// Holds the storage collaborator; all policy is fixed.
#[derive(Debug)]
pub struct LeaveLedger<R> {
    pub(super) repository: R,
}

impl<R: EmployeeRepository> LeaveLedger<R> {
    /// Creates a ledger over the given repository.
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Computes the company limit on leave days for a request.
    ///
    /// The company-wide share of prior-year leave already taken is read from
    /// storage on every call.
    pub fn compute_company_limit(
        &self,
        current_month: NaiveDate,
        prior_year_accrued: f64,
        contract_start_month: NaiveDate,
        first_leave_day: NaiveDate,
        last_leave_day: NaiveDate,
    ) -> LedgerResult<i64> {
        let breakdown = self.company_limit_breakdown(&LimitInputs {
            current_month,
            prior_year_accrued,
            contract_start_month,
            first_leave_day,
            last_leave_day,
        })?;
        Ok(breakdown.limit)
    }

    /// Computes the company limit with each of its terms.
    pub fn company_limit_breakdown(&self, inputs: &LimitInputs) -> LedgerResult<CompanyLimit> {
        let ratio = self.repository.prior_year_total_leave_taken_ratio()?;
        let breakdown = company_limit(inputs, ratio)?;
        debug!(
            company_ratio = ratio,
            base = breakdown.base,
            pacing = breakdown.pacing_adjustment,
            margin = breakdown.margin,
            seniority = breakdown.seniority_bonus,
            limit = breakdown.limit,
            "Company limit computed"
        );
        Ok(breakdown)
    }

    /// Validates a leave request and records it.
    ///
    /// The request is checked in order: legal eligibility, at least one
    /// chargeable day, no day before the current month, at most one day in
    /// the next leave-year, enough prior-year balance, and the company limit.
    /// On success the chargeable days are added to the record, the prior-year
    /// taken count is set to the current-year day count, and the record is
    /// saved.
    ///
    /// The company limit check rejects a request whose current-year day count
    /// is *below* the limit.
    ///
    /// # Errors
    ///
    /// Returns `IdentityMissing` or `EmployeeNotFound` if the record is not
    /// stored, before any policy check runs.
    pub fn request_leave(
        &self,
        employee: &mut Employee,
        first_day: NaiveDate,
        last_day: NaiveDate,
    ) -> LedgerResult<LeaveGrant> {
        let result = self.grant_leave(employee, first_day, last_day);
        match &result {
            Ok(grant) => info!(
                employee_id = ?employee.id,
                first_day = %first_day,
                last_day = %last_day,
                days = grant.days.len(),
                current_year_days = grant.current_year_days,
                limit = grant.company_limit.limit,
                "Leave granted"
            ),
            Err(err) => warn!(
                employee_id = ?employee.id,
                first_day = %first_day,
                last_day = %last_day,
                error = %err,
                "Leave request rejected"
            ),
        }
        result
    }

    fn grant_leave(
        &self,
        employee: &mut Employee,
        first_day: NaiveDate,
        last_day: NaiveDate,
    ) -> LedgerResult<LeaveGrant> {
        self.ensure_stored(employee)?;

        if !employee.is_entitled_to_paid_leave() {
            return Err(LedgerError::IneligibleEmployee);
        }

        let year_end = leave_year_end(employee.current_month)
            .ok_or_else(|| out_of_calendar(employee.current_month))?;

        // Days come in ascending order, so both range checks can stop early.
        let mut days = BTreeSet::new();
        let mut next_year_days = 0;
        for day in employee.chargeable_days_iter(first_day, last_day) {
            if days.is_empty() && day < employee.current_month {
                return Err(LedgerError::LeaveBeforeCurrentMonth {
                    first_day: day,
                    current_month: employee.current_month,
                });
            }
            if day > year_end {
                next_year_days += 1;
                // One day may spill into the next leave-year.
                if next_year_days > 1 {
                    return Err(LedgerError::SpansTooFarForward { year_end });
                }
            }
            days.insert(day);
        }
        if days.is_empty() {
            return Err(LedgerError::NoLeaveNeeded);
        }
        let current_year_days = days.len() - next_year_days;

        let remaining = employee.remaining_prior_year_leave();
        if current_year_days as f64 > remaining {
            return Err(LedgerError::ExceedsAccruedBalance {
                requested: current_year_days,
                remaining,
            });
        }

        let limit = self.company_limit_breakdown(&LimitInputs {
            current_month: employee.current_month,
            prior_year_accrued: employee.leave_accrued_prior_year,
            contract_start_month: employee.contract_start_month,
            first_leave_day: first_day,
            last_leave_day: last_day,
        })?;
        if (current_year_days as i64) < limit.limit {
            return Err(LedgerError::ExceedsCompanyLimit {
                requested: current_year_days,
                limit: limit.limit,
            });
        }

        let mut updated = employee.clone();
        updated.leave_days_taken.extend(days.iter().copied());
        updated.leave_taken_prior_year = current_year_days as f64;
        *employee = self.repository.save(updated)?;

        Ok(LeaveGrant {
            days,
            current_year_days,
            company_limit: limit,
        })
    }

    /// Closes the employee's current month.
    ///
    /// Adds `days_worked` and one month of accrued leave to the current
    /// leave-year, advances the month cursor, and closes the leave-year when
    /// the cursor reaches June. The record is saved once.
    ///
    /// # Errors
    ///
    /// Returns `IdentityMissing` or `EmployeeNotFound` if the record is not
    /// stored.
    pub fn close_month(&self, employee: &mut Employee, days_worked: f64) -> LedgerResult<MonthClose> {
        self.ensure_stored(employee)?;

        let mut updated = employee.clone();
        updated.days_worked_current_year += days_worked;
        updated.leave_accrued_current_year += MONTHLY_ACCRUAL;
        updated.current_month = updated
            .current_month
            .checked_add_months(Months::new(1))
            .ok_or_else(|| out_of_calendar(updated.current_month))?;

        let year_closed = updated.current_month.month() == LEAVE_YEAR_START_MONTH;
        if year_closed {
            roll_year(&mut updated)?;
        }

        *employee = self.repository.save(updated)?;
        info!(
            employee_id = ?employee.id,
            days_worked,
            current_month = %employee.current_month,
            year_closed,
            "Month closed"
        );

        Ok(MonthClose {
            current_month: employee.current_month,
            year_closed,
        })
    }

    /// Closes the leave-year that ended just before the employee's current
    /// month and saves the record.
    ///
    /// # Errors
    ///
    /// Returns `IdentityMissing` or `EmployeeNotFound` if the record is not
    /// stored.
    pub fn close_year(&self, employee: &mut Employee) -> LedgerResult<()> {
        self.ensure_stored(employee)?;

        let mut updated = employee.clone();
        roll_year(&mut updated)?;
        *employee = self.repository.save(updated)?;
        info!(
            employee_id = ?employee.id,
            leave_accrued_prior_year = employee.leave_accrued_prior_year,
            "Leave-year closed"
        );
        Ok(())
    }

    /// Checks that `employee` names a stored record, so that a save can only
    /// replace it and never create or resurrect one.
    fn ensure_stored(&self, employee: &Employee) -> LedgerResult<()> {
        let id = employee.id.ok_or(LedgerError::IdentityMissing)?;
        if self.repository.find_by_id(id)?.is_none() {
            return Err(LedgerError::EmployeeNotFound { id });
        }
        Ok(())
    }
}

/// Moves current-year counters to the prior year and drops leave days of the
/// closed leave-year.
fn roll_year(employee: &mut Employee) -> LedgerResult<()> {
    let closed_year_end = leave_year_start(employee.current_month)
        .and_then(|start| start.checked_sub_days(Days::new(1)))
        .ok_or_else(|| out_of_calendar(employee.current_month))?;

    employee.days_worked_prior_year = employee.days_worked_current_year;
    employee.leave_accrued_prior_year = employee.leave_accrued_current_year;
    employee.leave_taken_prior_year = 0.0;
    employee.days_worked_current_year = 0.0;
    employee.leave_accrued_current_year = 0.0;
    employee
        .leave_days_taken
        .retain(|day| *day > closed_year_end);
    Ok(())
}

fn out_of_calendar(month: NaiveDate) -> LedgerError {
    LedgerError::CalculationError {
        message: format!("leave-year of {} is outside the supported calendar", month),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::WorkingPattern;
    use crate::storage::InMemoryEmployeeRepository;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn ledger() -> LeaveLedger<InMemoryEmployeeRepository> {
        LeaveLedger::new(InMemoryEmployeeRepository::new())
    }

    /// An eligible employee at the start of the 2024-25 leave-year with 30
    /// days accrued in 2023-24.
    fn eligible_employee() -> Employee {
        let mut employee = Employee::new("Jeannette Dupontelle", date(2024, 1, 1), date(2024, 6, 1));
        employee.days_worked_prior_year = 220.0;
        employee.leave_accrued_prior_year = 30.0;
        employee.working_pattern = WorkingPattern::five_day_week();
        employee
    }

    fn stored(ledger: &LeaveLedger<InMemoryEmployeeRepository>, employee: Employee) -> Employee {
        ledger.create_employee(employee).unwrap()
    }

    /// Saves a second record so that the company-wide ratio is 0.5.
    fn seed_company_ratio(ledger: &LeaveLedger<InMemoryEmployeeRepository>) {
        let mut colleague = Employee::new("Colleague", date(2015, 1, 1), date(2024, 6, 1));
        colleague.leave_accrued_prior_year = 60.0;
        colleague.leave_taken_prior_year = 45.0;
        ledger.repository().save(colleague).unwrap();
    }

    #[test]
    fn test_compute_company_limit_reads_ratio_from_storage() {
        let ledger = ledger();
        seed_company_ratio(&ledger);

        // ratio = 45 / (60 + 30) = 0.5 once the employee is stored too
        ledger.repository().save(eligible_employee()).unwrap();
        let limit = ledger
            .compute_company_limit(
                date(2024, 6, 1),
                30.0,
                date(2024, 1, 1),
                date(2024, 7, 15),
                date(2024, 7, 19),
            )
            .unwrap();
        assert_eq!(limit, 5);
    }

    #[test]
    fn test_compute_company_limit_seniority_is_capped() {
        let ledger = ledger();
        let limit = ledger
            .compute_company_limit(
                date(2024, 1, 1),
                0.0,
                date(2010, 1, 1),
                date(2024, 1, 15),
                date(2024, 1, 19),
            )
            .unwrap();
        assert_eq!(limit, 10);
    }

    #[test]
    fn test_request_leave_records_days_and_overwrites_taken_count() {
        let ledger = ledger();
        seed_company_ratio(&ledger);
        let mut employee = ledger.repository().save(eligible_employee()).unwrap();
        employee.leave_taken_prior_year = 2.0;

        // limit with ratio 45/90 = 0.5 is 5 for a July request
        let grant = ledger
            .request_leave(&mut employee, date(2024, 7, 15), date(2024, 7, 19))
            .unwrap();

        assert_eq!(grant.days.len(), 5);
        assert_eq!(grant.current_year_days, 5);
        assert_eq!(grant.company_limit.limit, 5);
        assert_eq!(employee.leave_taken_prior_year, 5.0);
        assert_eq!(employee.leave_days_taken.len(), 5);

        let stored = ledger
            .repository()
            .find_by_id(employee.id.unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(stored, employee);
    }

    #[test]
    fn test_request_leave_rejects_ineligible_employee() {
        let ledger = ledger();
        let mut employee = stored(&ledger, eligible_employee());
        employee.days_worked_prior_year = 10.0;

        let err = ledger
            .request_leave(&mut employee, date(2024, 7, 15), date(2024, 7, 19))
            .unwrap_err();
        assert!(matches!(err, LedgerError::IneligibleEmployee));
    }

    #[test]
    fn test_request_leave_rejects_range_without_chargeable_day() {
        let ledger = ledger();
        let mut employee = stored(&ledger, eligible_employee());

        // Saturday and Sunday on a five-day week
        let err = ledger
            .request_leave(&mut employee, date(2024, 7, 20), date(2024, 7, 21))
            .unwrap_err();
        assert!(matches!(err, LedgerError::NoLeaveNeeded));
    }

    #[test]
    fn test_request_leave_rejects_days_before_current_month() {
        let ledger = ledger();
        let mut employee = stored(&ledger, eligible_employee());

        let err = ledger
            .request_leave(&mut employee, date(2024, 5, 27), date(2024, 6, 7))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::LeaveBeforeCurrentMonth { first_day, .. } if first_day == date(2024, 5, 27)
        ));
    }

    #[test]
    fn test_request_leave_rejects_two_days_in_next_leave_year() {
        let ledger = ledger();
        let mut employee = stored(&ledger, eligible_employee());
        employee.current_month = date(2025, 5, 1);

        // Friday May 30 to Tuesday June 3 2025: June 2 and 3 are next year
        let err = ledger
            .request_leave(&mut employee, date(2025, 5, 30), date(2025, 6, 3))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::SpansTooFarForward { year_end } if year_end == date(2025, 5, 31)
        ));
    }

    #[test]
    fn test_request_leave_allows_one_day_in_next_leave_year() {
        let ledger = ledger();
        let mut employee = stored(&ledger, eligible_employee());
        employee.current_month = date(2025, 5, 1);
        employee.contract_start_month = date(2015, 1, 1);

        // Friday May 30 to Monday June 2 2025: only June 2 is next year.
        // The seniority bonus keeps the limit above two days, so the request
        // passes the year check and is stopped by the company limit.
        let err = ledger
            .request_leave(&mut employee, date(2025, 5, 30), date(2025, 6, 2))
            .unwrap_err();
        assert!(matches!(err, LedgerError::ExceedsCompanyLimit { requested: 1, .. }));
    }

    #[test]
    fn test_request_leave_rejects_more_than_remaining_balance() {
        let ledger = ledger();
        let mut employee = stored(&ledger, eligible_employee());
        employee.leave_taken_prior_year = 27.0;

        let err = ledger
            .request_leave(&mut employee, date(2024, 7, 15), date(2024, 7, 19))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::ExceedsAccruedBalance { requested: 5, remaining } if remaining == 3.0
        ));
    }

    #[test]
    fn test_request_leave_rejects_count_below_company_limit() {
        let ledger = ledger();
        seed_company_ratio(&ledger);
        let mut employee = ledger.repository().save(eligible_employee()).unwrap();

        // January limit with ratio 0.5 is 16
        let err = ledger
            .request_leave(&mut employee, date(2025, 1, 13), date(2025, 1, 17))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::ExceedsCompanyLimit { requested: 5, limit: 16 }
        ));
    }

    #[test]
    fn test_rejected_request_leaves_record_untouched() {
        let ledger = ledger();
        seed_company_ratio(&ledger);
        let mut employee = ledger.repository().save(eligible_employee()).unwrap();
        let before = employee.clone();

        let first = ledger
            .request_leave(&mut employee, date(2025, 1, 13), date(2025, 1, 17))
            .unwrap_err();
        let second = ledger
            .request_leave(&mut employee, date(2025, 1, 13), date(2025, 1, 17))
            .unwrap_err();

        assert_eq!(first.kind(), ErrorKind::Policy);
        assert_eq!(
            std::mem::discriminant(&first),
            std::mem::discriminant(&second)
        );
        assert_eq!(employee, before);
        assert_eq!(
            ledger.repository().find_by_id(employee.id.unwrap()).unwrap(),
            Some(before)
        );
    }

    #[test]
    fn test_close_month_accrues_and_advances() {
        let ledger = ledger();
        let mut employee = stored(&ledger, eligible_employee());

        let close = ledger.close_month(&mut employee, 20.0).unwrap();

        assert_eq!(close.current_month, date(2024, 7, 1));
        assert!(!close.year_closed);
        assert_eq!(employee.days_worked_current_year, 20.0);
        assert_eq!(employee.leave_accrued_current_year, 2.5);
    }

    #[test]
    fn test_close_month_in_may_closes_year() {
        let ledger = ledger();
        let mut employee = stored(&ledger, eligible_employee());
        employee.current_month = date(2025, 5, 1);
        employee.days_worked_current_year = 200.0;
        employee.leave_accrued_current_year = 27.5;
        employee.leave_taken_prior_year = 12.0;
        employee.leave_days_taken = [date(2024, 7, 15), date(2025, 5, 30), date(2025, 6, 2)]
            .into_iter()
            .collect();

        let close = ledger.close_month(&mut employee, 20.0).unwrap();

        assert!(close.year_closed);
        assert_eq!(employee.current_month, date(2025, 6, 1));
        assert_eq!(employee.days_worked_prior_year, 220.0);
        assert_eq!(employee.leave_accrued_prior_year, 30.0);
        assert_eq!(employee.leave_taken_prior_year, 0.0);
        assert_eq!(employee.days_worked_current_year, 0.0);
        assert_eq!(employee.leave_accrued_current_year, 0.0);
        assert_eq!(
            employee.leave_days_taken.iter().copied().collect::<Vec<_>>(),
            vec![date(2025, 6, 2)]
        );
    }

    #[test]
    fn test_twelve_month_closes_cascade_exactly_once() {
        for start_month in 1..=12 {
            let ledger = ledger();
            let mut employee = stored(&ledger, eligible_employee());
            employee.current_month = date(2024, start_month, 1);

            let year_closes = (0..12)
                .map(|_| ledger.close_month(&mut employee, 20.0).unwrap())
                .filter(|close| close.year_closed)
                .count();

            assert_eq!(year_closes, 1, "starting from month {start_month}");
            assert_eq!(employee.current_month, date(2025, start_month, 1));
        }
    }

    #[test]
    fn test_close_year_resets_and_prunes() {
        let ledger = ledger();
        let mut employee = stored(&ledger, eligible_employee());
        employee.days_worked_current_year = 150.0;
        employee.leave_accrued_current_year = 25.0;
        employee.leave_taken_prior_year = 8.0;
        employee.leave_days_taken = [date(2024, 5, 31), date(2024, 6, 3)].into_iter().collect();

        ledger.close_year(&mut employee).unwrap();

        assert_eq!(employee.days_worked_prior_year, 150.0);
        assert_eq!(employee.leave_accrued_prior_year, 25.0);
        assert_eq!(employee.leave_taken_prior_year, 0.0);
        assert_eq!(employee.days_worked_current_year, 0.0);
        assert_eq!(employee.leave_accrued_current_year, 0.0);
        assert!(employee.leave_days_taken.iter().all(|day| *day > date(2024, 5, 31)));
        assert_eq!(employee.leave_days_taken.len(), 1);
    }

    #[test]
    fn test_request_leave_stops_at_second_next_year_day() {
        let ledger = ledger();
        let mut employee = stored(&ledger, eligible_employee());

        let err = ledger
            .request_leave(&mut employee, date(2024, 6, 3), date(2624, 6, 3))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::SpansTooFarForward { year_end } if year_end == date(2025, 5, 31)
        ));
        assert!(employee.leave_days_taken.is_empty());
    }

    #[test]
    fn test_request_leave_in_last_calendar_year_is_calculation_error() {
        let ledger = ledger();
        let last_year = NaiveDate::MAX.year();
        let mut record = eligible_employee();
        record.current_month = date(last_year, 6, 1);
        let mut employee = stored(&ledger, record);

        let err = ledger
            .request_leave(&mut employee, date(last_year, 6, 3), date(last_year, 6, 10))
            .unwrap_err();
        assert!(matches!(err, LedgerError::CalculationError { .. }));
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_close_year_in_first_calendar_year_is_calculation_error() {
        let ledger = ledger();
        let mut record = eligible_employee();
        record.current_month = date(NaiveDate::MIN.year(), 1, 1);
        let mut employee = stored(&ledger, record);
        let before = employee.clone();

        let err = ledger.close_year(&mut employee).unwrap_err();
        assert!(matches!(err, LedgerError::CalculationError { .. }));
        assert_eq!(employee, before);
    }

    #[test]
    fn test_close_month_after_delete_is_rejected() {
        let ledger = ledger();
        let mut stale = stored(&ledger, eligible_employee());
        let id = stale.id.unwrap();
        ledger.delete_employee(id).unwrap();

        let err = ledger.close_month(&mut stale, 20.0).unwrap_err();
        assert!(matches!(err, LedgerError::EmployeeNotFound { id: missing } if missing == id));
        assert!(ledger.get_employee(id).unwrap().is_none());
        assert_eq!(ledger.count_employees().unwrap(), 0);
    }

    #[test]
    fn test_operations_on_unsaved_record_are_rejected() {
        let ledger = ledger();
        let mut employee = eligible_employee();

        let err = ledger.close_month(&mut employee, 20.0).unwrap_err();
        assert!(matches!(err, LedgerError::IdentityMissing));
        let err = ledger.close_year(&mut employee).unwrap_err();
        assert!(matches!(err, LedgerError::IdentityMissing));
        let err = ledger
            .request_leave(&mut employee, date(2024, 7, 15), date(2024, 7, 19))
            .unwrap_err();
        assert!(matches!(err, LedgerError::IdentityMissing));

        assert_eq!(ledger.count_employees().unwrap(), 0);
    }

    #[test]
    fn test_request_leave_on_deleted_record_is_rejected() {
        let ledger = ledger();
        let mut stale = stored(&ledger, eligible_employee());
        ledger.delete_employee(stale.id.unwrap()).unwrap();

        let err = ledger
            .request_leave(&mut stale, date(2024, 7, 15), date(2024, 7, 19))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert_eq!(ledger.count_employees().unwrap(), 0);
    }
}
