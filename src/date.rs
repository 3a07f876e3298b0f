//! Calendar math over `NaiveDate` at day granularity.
//!
//! Weeks start on Sunday throughout: `weekday_index` is 0 for Sunday and 6
//! for Saturday. User-supplied text is checked here, so everything past this
//! module can assume a date inside the supported year range.
use chrono::{Datelike, Months, NaiveDate};

use crate::error::DateError;

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

pub const ISO_FORMAT: &str = "%Y-%m-%d";

// ─── Month boundaries ─────────────────────────────────────────────────────────

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Day before the first of the next month; `None` only at chrono's limits.
pub fn last_of_month(date: NaiveDate) -> Option<NaiveDate> {
    first_of_month(date).checked_add_months(Months::new(1))?.pred_opt()
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    last_of_month(first).map(|last| last.day())
}

// ─── Comparisons ──────────────────────────────────────────────────────────────

pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

pub fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

pub fn same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    month_key(a) == month_key(b)
}

// ─── Boundary parsing ─────────────────────────────────────────────────────────

/// Parses a user-supplied date, trying ISO `YYYY-MM-DD` first and then
/// `display_format` (a chrono format string such as `%d/%m/%Y`).
pub fn parse_date(input: &str, display_format: &str) -> Result<NaiveDate, DateError> {
    let s = input.trim();
    let parsed = NaiveDate::parse_from_str(s, ISO_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(s, display_format))
        .map_err(|e| DateError::Invalid { input: input.to_owned(), reason: e.to_string() })?;
    ensure_supported(parsed)
}

/// Parses a month reference: `YYYY-MM`, or any full date accepted by
/// [`parse_date`]. Returns the first day of that month.
pub fn parse_month(input: &str, display_format: &str) -> Result<NaiveDate, DateError> {
    let s = input.trim();
    if let Some((y, m)) = s.split_once('-') {
        if !m.contains('-') {
            let year: i32 = y.parse().map_err(|_| invalid(input, "year is not a number"))?;
            let month: u32 = m.parse().map_err(|_| invalid(input, "month is not a number"))?;
            if !(1..=12).contains(&month) {
                return Err(invalid(input, "month must be 1-12"));
            }
            if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
                return Err(DateError::OutOfRange(input.to_owned()));
            }
            return NaiveDate::from_ymd_opt(year, month, 1)
                .ok_or_else(|| invalid(input, "no such month"));
        }
    }
    parse_date(s, display_format).map(first_of_month)
}

pub fn ensure_supported(date: NaiveDate) -> Result<NaiveDate, DateError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        Ok(date)
    } else {
        Err(DateError::OutOfRange(date.to_string()))
    }
}

fn invalid(input: &str, reason: &str) -> DateError {
    DateError::Invalid { input: input.to_owned(), reason: reason.to_owned() }
}
