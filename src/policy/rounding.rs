//! Rounding of the company limit.
//!
//! The limit is computed in floating point and rounded in two stages: first
//! to three decimal places (half away from zero) on the shortest decimal
//! representation of the float, then to the nearest integer with halves
//! going up. The two stages are not equivalent to a single rounding: 2.4996
//! becomes 2.500 and then 3, where a direct rounding would give 2.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{LedgerError, LedgerResult};

/// Rounds a raw limit to a whole number of days.
///
/// # Errors
///
/// Returns `CalculationError` if `value` is not finite or does not fit in a
/// [`Decimal`].
///
/// # Example
///
/// ```
/// use conges_ledger::policy::round_limit;
///
/// assert_eq!(round_limit(4.5375).unwrap(), 5);
/// assert_eq!(round_limit(2.4996).unwrap(), 3);
/// assert_eq!(round_limit(2.4994).unwrap(), 2);
/// ```
pub fn round_limit(value: f64) -> LedgerResult<i64> {
    if !value.is_finite() {
        return Err(LedgerError::CalculationError {
            message: format!("company limit is not a finite number: {}", value),
        });
    }

    let decimal = Decimal::from_str(&value.to_string()).map_err(|e| {
        LedgerError::CalculationError {
            message: format!("company limit {} cannot be represented: {}", value, e),
        }
    })?;
    let thousandths = decimal.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);

    (thousandths + Decimal::new(5, 1))
        .floor()
        .to_i64()
        .ok_or_else(|| LedgerError::CalculationError {
            message: format!("company limit {} is out of range", thousandths),
        })
}
