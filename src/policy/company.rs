//! Fixed company policy constants and leave-year arithmetic.
//!
//! A leave-year runs from June 1 to May 31. Months are weighted so that July
//! and August count for more than the rest of the year, which lets employees
//! take a larger share of their leave in summer.

use chrono::{Datelike, NaiveDate};

/// Leave days accrued for every closed month.
pub const MONTHLY_ACCRUAL: f64 = 2.5;

/// Weight of July and August in the leave-year.
pub const PEAK_MONTH_WEIGHT: u32 = 20;

/// Weight of every other month in the leave-year.
pub const OFF_PEAK_MONTH_WEIGHT: u32 = 8;

/// Total weight of a full leave-year (10 off-peak months, 2 peak months).
pub const LEAVE_YEAR_WEIGHT: u32 = 10 * OFF_PEAK_MONTH_WEIGHT + 2 * PEAK_MONTH_WEIGHT;

/// Share of the prior-year balance used as bonus or malus when the
/// employee's pace differs from the company-wide pace.
pub const BONUS_MALUS_RATE: f64 = 0.2;

/// Extra margin granted per twelfth of a year between now and the leave.
pub const MARGIN_RATE: f64 = 0.1;

/// Seniority counts one extra day per year, up to this many years.
pub const SENIORITY_CAP_YEARS: i32 = 10;

/// Calendar month on whose first day a leave-year starts.
pub const LEAVE_YEAR_START_MONTH: u32 = 6;

/// Days worked in the prior leave-year that must be exceeded to be legally
/// entitled to paid leave.
pub const ELIGIBILITY_MIN_DAYS_WORKED: f64 = 10.0;

/// Returns the weight of a calendar month (1 = January).
///
/// # Example
///
/// ```
/// use conges_ledger::policy::month_weight;
///
/// assert_eq!(month_weight(7), 20);
/// assert_eq!(month_weight(1), 8);
/// ```
pub fn month_weight(month: u32) -> u32 {
    match month {
        7 | 8 => PEAK_MONTH_WEIGHT,
        _ => OFF_PEAK_MONTH_WEIGHT,
    }
}

/// Returns how far through its leave-year `date` falls, weighted by month.
///
/// The weights of every month from June up to and including the month of
/// `date` are summed and divided by [`LEAVE_YEAR_WEIGHT`]. June gives
/// `8/120`, July `28/120`, August `48/120`, and May the full `1.0`.
/// The month of `date` counts in full, so the proportion is never 0, not
/// even on June 1.
///
/// # Example
///
/// ```
/// use conges_ledger::policy::weighted_month_proportion;
/// use chrono::NaiveDate;
///
/// let july = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
/// assert_eq!(weighted_month_proportion(july), 28.0 / 120.0);
///
/// let may = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
/// assert_eq!(weighted_month_proportion(may), 1.0);
/// ```
pub fn weighted_month_proportion(date: NaiveDate) -> f64 {
    // 1 for June, 12 for May
    let position = (date.month() + 12 - LEAVE_YEAR_START_MONTH) % 12 + 1;
    let points: u32 = (0..position)
        .map(|offset| month_weight((LEAVE_YEAR_START_MONTH - 1 + offset) % 12 + 1))
        .sum();
    f64::from(points) / f64::from(LEAVE_YEAR_WEIGHT)
}

/// Returns the first day of the leave-year containing `reference`.
///
/// That is June 1 of the same year when `reference` falls in June or later,
/// and June 1 of the previous year otherwise. Returns `None` when that day
/// is outside the supported calendar range.
///
/// # Example
///
/// ```
/// use conges_ledger::policy::leave_year_start;
/// use chrono::NaiveDate;
///
/// let january = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(leave_year_start(january), NaiveDate::from_ymd_opt(2023, 6, 1));
///
/// let june = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
/// assert_eq!(leave_year_start(june), NaiveDate::from_ymd_opt(2024, 6, 1));
///
/// assert_eq!(leave_year_start(NaiveDate::MIN), None);
/// ```
pub fn leave_year_start(reference: NaiveDate) -> Option<NaiveDate> {
    let year = if reference.month() >= LEAVE_YEAR_START_MONTH {
        reference.year()
    } else {
        reference.year() - 1
    };
    NaiveDate::from_ymd_opt(year, LEAVE_YEAR_START_MONTH, 1)
}

/// Returns the last day (May 31) of the leave-year containing `reference`,
/// or `None` when that day is outside the supported calendar range.
pub fn leave_year_end(reference: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(leave_year_start(reference)?.year() + 1, 5, 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Months};
    use proptest::prelude::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_leave_year_weight_is_120() {
        assert_eq!(LEAVE_YEAR_WEIGHT, 120);
        let total: u32 = (1..=12).map(month_weight).sum();
        assert_eq!(total, LEAVE_YEAR_WEIGHT);
    }

    #[test]
    fn test_weighted_proportion_known_months() {
        assert_eq!(weighted_month_proportion(date(2024, 6, 1)), 8.0 / 120.0);
        assert_eq!(weighted_month_proportion(date(2024, 7, 31)), 28.0 / 120.0);
        assert_eq!(weighted_month_proportion(date(2024, 8, 1)), 48.0 / 120.0);
        assert_eq!(weighted_month_proportion(date(2024, 9, 10)), 56.0 / 120.0);
        assert_eq!(weighted_month_proportion(date(2025, 1, 13)), 88.0 / 120.0);
        assert_eq!(weighted_month_proportion(date(2025, 5, 31)), 1.0);
    }

    #[test]
    fn test_weighted_proportion_ignores_day_of_month() {
        assert_eq!(
            weighted_month_proportion(date(2024, 10, 1)),
            weighted_month_proportion(date(2024, 10, 31))
        );
    }

    #[test]
    fn test_weighted_proportion_non_decreasing_through_leave_year() {
        let start = date(2024, 6, 1);
        let proportions: Vec<f64> = (0..12)
            .map(|m| weighted_month_proportion(start + Months::new(m)))
            .collect();
        assert!(proportions.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(proportions[0], 8.0 / 120.0);
        assert_eq!(proportions[11], 1.0);
    }

    #[test]
    fn test_peak_months_grow_faster() {
        let june = weighted_month_proportion(date(2024, 6, 1));
        let july = weighted_month_proportion(date(2024, 7, 1));
        let sept = weighted_month_proportion(date(2024, 9, 1));
        let oct = weighted_month_proportion(date(2024, 10, 1));
        assert!(july - june > oct - sept);
    }

    #[test]
    fn test_leave_year_start_before_june() {
        assert_eq!(leave_year_start(date(2024, 5, 31)), Some(date(2023, 6, 1)));
        assert_eq!(leave_year_start(date(2024, 1, 1)), Some(date(2023, 6, 1)));
    }

    #[test]
    fn test_leave_year_start_from_june() {
        assert_eq!(leave_year_start(date(2024, 6, 1)), Some(date(2024, 6, 1)));
        assert_eq!(leave_year_start(date(2024, 12, 31)), Some(date(2024, 6, 1)));
    }

    #[test]
    fn test_leave_year_end() {
        assert_eq!(leave_year_end(date(2024, 1, 1)), Some(date(2024, 5, 31)));
        assert_eq!(leave_year_end(date(2024, 6, 1)), Some(date(2025, 5, 31)));
    }

    #[test]
    fn test_leave_year_bounds_at_calendar_limits() {
        let last_year_june = date(NaiveDate::MAX.year(), 6, 1);
        assert_eq!(leave_year_start(last_year_june), Some(last_year_june));
        assert_eq!(leave_year_end(last_year_june), None);

        let first_year_january = date(NaiveDate::MIN.year(), 1, 1);
        assert_eq!(leave_year_start(first_year_january), None);
        assert_eq!(leave_year_end(first_year_january), None);
    }

    proptest! {
        #[test]
        fn prop_leave_year_start_is_june_first_on_or_before(offset in 0i64..80_000) {
            let reference = date(1950, 1, 1) + Duration::days(offset);
            let start = leave_year_start(reference).unwrap();
            prop_assert!(start <= reference);
            prop_assert_eq!(start.month(), 6);
            prop_assert_eq!(start.day(), 1);
            prop_assert!(reference < start + Months::new(12));
        }

        #[test]
        fn prop_weighted_proportion_in_unit_interval(offset in 0i64..80_000) {
            let reference = date(1950, 1, 1) + Duration::days(offset);
            let proportion = weighted_month_proportion(reference);
            prop_assert!(proportion > 0.0);
            prop_assert!(proportion <= 1.0);
        }

        #[test]
        fn prop_weighted_proportion_monotonic_within_leave_year(a in 0i64..365, b in 0i64..365) {
            let start = date(2023, 6, 1);
            let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(
                weighted_month_proportion(start + Duration::days(earlier))
                    <= weighted_month_proportion(start + Duration::days(later))
            );
        }
    }
}
