//! Offset fiscal-quarter classification for disbursements.
//!
//! Superannuation disbursements are reported against quarters that open on the
//! 29th of a month rather than the 1st:
//!
//! | Quarter | Window            |
//! |---------|-------------------|
//! | Q1      | Jan 29 - Apr 28   |
//! | Q2      | Apr 29 - Jul 28   |
//! | Q3      | Jul 29 - Oct 28   |
//! | Q4      | Oct 29 - Jan 28   |
//!
//! Q4 crosses the calendar-year boundary, so January 29 is the fiscal new
//! year: January 1-28 belongs to Q4 of the previous fiscal year. The window
//! table and [`offset_fiscal_year`] both encode that boundary and must change
//! together.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::Quarter;

/// The January day on which the offset fiscal year starts.
pub const FISCAL_YEAR_START_DAY: u32 = 29;

/// One quarter's window as (month, day) bounds, both inclusive.
///
/// A window whose end precedes its start wraps into the following calendar
/// year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterWindow {
    /// The quarter this window classifies into.
    pub quarter: Quarter,
    /// First (month, day) of the window.
    pub start: (u32, u32),
    /// Last (month, day) of the window.
    pub end: (u32, u32),
}

impl QuarterWindow {
    /// Returns true if the window runs past December 31.
    pub fn wraps_year(&self) -> bool {
        self.end < self.start
    }

    /// Resolves the window to concrete dates for a date in calendar `year`.
    ///
    /// A wrapping window is anchored to the previous year when the date falls
    /// before the fiscal new year. Returns `None` if either bound is not a
    /// valid calendar date.
    fn bounds(&self, year: i32, before_fiscal_new_year: bool) -> Option<(NaiveDate, NaiveDate)> {
        let start_year = if self.wraps_year() && before_fiscal_new_year {
            year.checked_sub(1)?
        } else {
            year
        };
        let end_year = if self.wraps_year() {
            start_year.checked_add(1)?
        } else {
            start_year
        };

        let start = NaiveDate::from_ymd_opt(start_year, self.start.0, self.start.1)?;
        let end = NaiveDate::from_ymd_opt(end_year, self.end.0, self.end.1)?;
        Some((start, end))
    }
}

/// The disbursement quarter windows, in the order they are tested.
pub const OFFSET_QUARTER_WINDOWS: [QuarterWindow; 4] = [
    QuarterWindow {
        quarter: Quarter::Q1,
        start: (1, 29),
        end: (4, 28),
    },
    QuarterWindow {
        quarter: Quarter::Q2,
        start: (4, 29),
        end: (7, 28),
    },
    QuarterWindow {
        quarter: Quarter::Q3,
        start: (7, 29),
        end: (10, 28),
    },
    QuarterWindow {
        quarter: Quarter::Q4,
        start: (10, 29),
        end: (1, 28),
    },
];

fn is_before_fiscal_new_year(date: NaiveDate) -> bool {
    date.month() == 1 && date.day() < FISCAL_YEAR_START_DAY
}

/// Classifies a date against an explicit window table.
///
/// Returns the quarter of the first window containing `date`, or `None` when
/// no window does. With [`OFFSET_QUARTER_WINDOWS`] every representable date
/// except the extremes of the calendar is covered.
pub fn offset_quarter_in(date: NaiveDate, windows: &[QuarterWindow]) -> Option<Quarter> {
    let year = date.year();
    let before_fiscal_new_year = is_before_fiscal_new_year(date);

    windows
        .iter()
        .find(|window| {
            window
                .bounds(year, before_fiscal_new_year)
                .is_some_and(|(start, end)| start <= date && date <= end)
        })
        .map(|window| window.quarter)
}

/// Returns the offset fiscal quarter of a disbursement.
///
/// Time of day is discarded before comparison: a payment at 23:59 on April 28
/// is still Q1.
///
/// # Example
///
/// ```
/// use super_variance::calculation::offset_quarter;
/// use super_variance::models::Quarter;
/// use chrono::NaiveDateTime;
///
/// let paid = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap();
/// assert_eq!(offset_quarter(paid("2023-04-28T23:59:59")), Some(Quarter::Q1));
/// assert_eq!(offset_quarter(paid("2023-04-29T00:00:00")), Some(Quarter::Q2));
/// assert_eq!(offset_quarter(paid("2023-01-28T12:00:00")), Some(Quarter::Q4));
/// ```
pub fn offset_quarter(payment_made: NaiveDateTime) -> Option<Quarter> {
    offset_quarter_in(payment_made.date(), &OFFSET_QUARTER_WINDOWS)
}

/// Returns the offset fiscal year of a disbursement.
///
/// Payments made in January before the 29th belong to the previous year.
///
/// # Example
///
/// ```
/// use super_variance::calculation::offset_fiscal_year;
/// use chrono::NaiveDateTime;
///
/// let paid = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap();
/// assert_eq!(offset_fiscal_year(paid("2024-01-28T00:00:00")), 2023);
/// assert_eq!(offset_fiscal_year(paid("2024-01-29T00:00:00")), 2024);
/// ```
pub fn offset_fiscal_year(payment_made: NaiveDateTime) -> i32 {
    let date = payment_made.date();
    if is_before_fiscal_new_year(date) {
        date.year() - 1
    } else {
        date.year()
    }
}

/// Returns the (fiscal year, quarter) bucket of a disbursement, or `None` if
/// its date falls in no quarter window.
pub fn classify_offset(payment_made: NaiveDateTime) -> Option<(i32, Quarter)> {
    offset_quarter(payment_made).map(|quarter| (offset_fiscal_year(payment_made), quarter))
}
