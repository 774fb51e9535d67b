//! Company limit on leave days.
//!
//! The limit starts from the prior-year balance scaled by how far the leave
//! falls into the weighted leave-year, then receives a pacing bonus or malus,
//! a lead-time margin and a seniority bonus before being rounded.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::LedgerResult;

use super::company::{
    BONUS_MALUS_RATE, LEAVE_YEAR_START_MONTH, MARGIN_RATE, SENIORITY_CAP_YEARS,
    weighted_month_proportion,
};
use super::rounding::round_limit;

/// Inputs of the company limit, taken from the employee record and the
/// requested leave range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitInputs {
    /// The employee's current month cursor.
    pub current_month: NaiveDate,
    /// Leave days accrued during the prior leave-year.
    pub prior_year_accrued: f64,
    /// The month the employee's contract started.
    pub contract_start_month: NaiveDate,
    /// First day of the requested range.
    pub first_leave_day: NaiveDate,
    /// Last day of the requested range.
    pub last_leave_day: NaiveDate,
}

/// The company limit together with each term that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyLimit {
    /// The larger weighted proportion of the two range endpoints.
    pub weighted_proportion: f64,
    /// `weighted_proportion × prior_year_accrued`.
    pub base: f64,
    /// Bonus (positive) or malus (negative) from the company-wide pace.
    pub pacing_adjustment: f64,
    /// Lead-time margin, negative when the leave month precedes the current
    /// month in calendar order.
    pub margin: f64,
    /// Capped years of seniority.
    pub seniority_bonus: f64,
    /// Sum of all terms before rounding.
    pub unrounded: f64,
    /// The rounded limit in days.
    pub limit: i64,
}

/// Computes the company limit for a leave request.
///
/// `company_leave_ratio` is the share of the prior-year balance already taken
/// across all employees.
///
/// Month differences use a sign-preserving remainder, so a leave month that
/// comes before June (or before the current month) in calendar order yields
/// a negative year progress (or a negative margin).
///
/// # Errors
///
/// Returns `CalculationError` if the result cannot be rounded.
///
/// # Example
///
/// ```
/// use conges_ledger::policy::{LimitInputs, company_limit};
/// use chrono::NaiveDate;
///
/// let inputs = LimitInputs {
///     current_month: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///     prior_year_accrued: 30.0,
///     contract_start_month: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     first_leave_day: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
///     last_leave_day: NaiveDate::from_ymd_opt(2024, 7, 19).unwrap(),
/// };
///
/// let result = company_limit(&inputs, 0.5).unwrap();
/// assert_eq!(result.unrounded, 4.5375);
/// assert_eq!(result.limit, 5);
/// ```
pub fn company_limit(inputs: &LimitInputs, company_leave_ratio: f64) -> LedgerResult<CompanyLimit> {
    let accrued = inputs.prior_year_accrued;

    let weighted_proportion = weighted_month_proportion(inputs.first_leave_day)
        .max(weighted_month_proportion(inputs.last_leave_day));
    let base = weighted_proportion * accrued;
    let mut limit = base;

    // Every leave-year starts in June, whatever the current month.
    let months_since_year_start =
        (inputs.first_leave_day.month() as i32 - LEAVE_YEAR_START_MONTH as i32) % 12;
    let year_progress = f64::from(months_since_year_start) / 12.0;
    let pacing_adjustment = (year_progress - company_leave_ratio) * BONUS_MALUS_RATE * accrued;
    limit += pacing_adjustment;

    let month_distance =
        (inputs.last_leave_day.month() as i32 - inputs.current_month.month() as i32) % 12;
    let margin = limit * MARGIN_RATE * f64::from(month_distance) / 12.0;
    limit += margin;

    let seniority = (inputs.current_month.year() - inputs.contract_start_month.year())
        .min(SENIORITY_CAP_YEARS);
    let seniority_bonus = f64::from(seniority);
    limit += seniority_bonus;

    Ok(CompanyLimit {
        weighted_proportion,
        base,
        pacing_adjustment,
        margin,
        seniority_bonus,
        unrounded: limit,
        limit: round_limit(limit)?,
    })
}
