//! Public holidays observed by the company.
//!
//! French public holidays are never charged as leave days, whatever the
//! employee's working pattern.

use chrono::{Datelike, Days, NaiveDate};

/// Fixed-date holidays as (month, day).
const FIXED_HOLIDAYS: [(u32, u32); 8] = [
    (1, 1),   // Jour de l'an
    (5, 1),   // Fête du travail
    (5, 8),   // Victoire 1945
    (7, 14),  // Fête nationale
    (8, 15),  // Assomption
    (11, 1),  // Toussaint
    (11, 11), // Armistice
    (12, 25), // Noël
];

/// Offsets in days from Easter Sunday: Easter Monday, Ascension, Whit Monday.
const EASTER_OFFSETS: [u64; 3] = [1, 39, 50];

/// Returns the date of Easter Sunday in the Gregorian calendar.
///
/// Uses the anonymous Gregorian computus (Meeus/Jones/Butcher).
///
/// # Example
///
/// ```
/// use conges_ledger::policy::easter_sunday;
/// use chrono::NaiveDate;
///
/// assert_eq!(easter_sunday(2024), NaiveDate::from_ymd_opt(2024, 3, 31));
/// assert_eq!(easter_sunday(2025), NaiveDate::from_ymd_opt(2025, 4, 20));
/// ```
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

/// Returns true if `date` is a company public holiday.
///
/// # Example
///
/// ```
/// use conges_ledger::policy::is_public_holiday;
/// use chrono::NaiveDate;
///
/// assert!(is_public_holiday(NaiveDate::from_ymd_opt(2024, 7, 14).unwrap()));
/// // Easter Monday 2024
/// assert!(is_public_holiday(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
/// assert!(!is_public_holiday(NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()));
/// ```
pub fn is_public_holiday(date: NaiveDate) -> bool {
    if FIXED_HOLIDAYS.contains(&(date.month(), date.day())) {
        return true;
    }
    easter_sunday(date.year()).is_some_and(|easter| {
        EASTER_OFFSETS
            .iter()
            .any(|offset| easter.checked_add_days(Days::new(*offset)) == Some(date))
    })
}
