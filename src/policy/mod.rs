//! Company leave policy.
//!
//! The policy is fixed: it is a set of constants and pure functions that
//! place a date inside the June-to-May leave-year, weight the months of that
//! year, recognise public holidays, and derive the company limit on leave
//! days an employee may take.

mod company;
mod holidays;
mod limit;
mod rounding;

pub use company::{
    BONUS_MALUS_RATE, ELIGIBILITY_MIN_DAYS_WORKED, LEAVE_YEAR_START_MONTH, LEAVE_YEAR_WEIGHT,
    MARGIN_RATE, MONTHLY_ACCRUAL, OFF_PEAK_MONTH_WEIGHT, PEAK_MONTH_WEIGHT, SENIORITY_CAP_YEARS,
    leave_year_end, leave_year_start, month_weight, weighted_month_proportion,
};
pub use holidays::{easter_sunday, is_public_holiday};
pub use limit::{CompanyLimit, LimitInputs, company_limit};
pub use rounding::round_limit;
