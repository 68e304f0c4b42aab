//! Calendar-quarter classification for pay periods.
//!
//! Payslip lines are bucketed by the calendar quarter of their pay-period end
//! date; no offset applies.

use chrono::{Datelike, NaiveDate};

use crate::models::Quarter;

/// Returns the calendar quarter a date falls in.
///
/// Months 1-3 are Q1, 4-6 Q2, 7-9 Q3 and 10-12 Q4.
///
/// # Example
///
/// ```
/// use super_variance::calculation::seasonal_quarter;
/// use super_variance::models::Quarter;
/// use chrono::NaiveDate;
///
/// let march = NaiveDate::from_ymd_opt(2023, 3, 31).unwrap();
/// let april = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
/// assert_eq!(seasonal_quarter(march), Quarter::Q1);
/// assert_eq!(seasonal_quarter(april), Quarter::Q2);
/// ```
pub fn seasonal_quarter(date: NaiveDate) -> Quarter {
    match date.month() {
        1..=3 => Quarter::Q1,
        4..=6 => Quarter::Q2,
        7..=9 => Quarter::Q3,
        _ => Quarter::Q4,
    }
}

/// Returns the year a pay period is reported under: its calendar year.
pub fn seasonal_year(date: NaiveDate) -> i32 {
    date.year()
}
