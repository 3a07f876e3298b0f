use chrono::{Days, Month, Months, NaiveDate};
use serde::Serialize;

use crate::date::{
    ensure_supported, first_of_month, last_of_month, month_key, same_day, same_month,
    weekday_index,
};
use crate::error::DateError;

pub const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

// ─── Data types ───────────────────────────────────────────────────────────────

/// One cell of the month view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDate {
    pub date:        NaiveDate,
    pub is_today:    bool,
    pub is_selected: bool,
}

/// Seven cells, Sunday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekRow(pub [CalendarDate; 7]);

impl WeekRow {
    pub fn days(&self) -> &[CalendarDate; 7] { &self.0 }
    pub fn sunday(&self) -> NaiveDate { self.0[0].date }
    pub fn saturday(&self) -> NaiveDate { self.0[6].date }
}

impl<'a> IntoIterator for &'a WeekRow {
    type Item     = &'a CalendarDate;
    type IntoIter = std::slice::Iter<'a, CalendarDate>;
    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}

/// Full weeks covering one month, including the leading and trailing days
/// of the neighbouring months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarGrid {
    month: NaiveDate,
    weeks: Vec<WeekRow>,
}

impl CalendarGrid {
    /// First day of the month this grid was built for.
    pub fn month(&self) -> NaiveDate { self.month }
    pub fn weeks(&self) -> &[WeekRow] { &self.weeks }

    pub fn cells(&self) -> impl Iterator<Item = &CalendarDate> + '_ {
        self.weeks.iter().flat_map(|w| w.0.iter())
    }

    /// Number of cells, always a multiple of 7.
    pub fn len(&self) -> usize { self.weeks.len() * 7 }
    pub fn is_empty(&self) -> bool { self.weeks.is_empty() }

    pub fn first_date(&self) -> Option<NaiveDate> { self.weeks.first().map(WeekRow::sunday) }
    pub fn last_date(&self) -> Option<NaiveDate> { self.weeks.last().map(WeekRow::saturday) }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.first_date(), self.last_date()) {
            (Some(first), Some(last)) => first <= date && date <= last,
            _ => false,
        }
    }

    pub fn cell(&self, date: NaiveDate) -> Option<&CalendarDate> {
        self.cells().find(|c| c.date == date)
    }

    pub fn today(&self) -> Option<&CalendarDate> { self.cells().find(|c| c.is_today) }
    pub fn selected(&self) -> Option<&CalendarDate> { self.cells().find(|c| c.is_selected) }

    /// Whether `date` belongs to the displayed month rather than a padding week.
    pub fn in_month(&self, date: NaiveDate) -> bool { same_month(date, self.month) }
}

// ─── Builder ──────────────────────────────────────────────────────────────────

/// Builds the Sunday-start grid for the month containing `reference_month`.
///
/// The grid runs from the Sunday on or before the 1st to the Saturday on or
/// after the last day, so it always holds 4, 5 or 6 rows. Only the year and
/// month of `reference_month` matter; `selected_date` and `today` are only
/// compared and may lie anywhere.
///
/// Fails with [`DateError::OutOfRange`] when `reference_month` is outside the
/// supported years.
pub fn build_grid(
    reference_month: NaiveDate,
    selected_date: NaiveDate,
    today: NaiveDate,
) -> Result<CalendarGrid, DateError> {
    let first = first_of_month(ensure_supported(reference_month)?);
    let out_of_range = || DateError::OutOfRange(reference_month.to_string());
    let last  = last_of_month(first).ok_or_else(out_of_range)?;

    let grid_start = first
        .checked_sub_days(Days::new(weekday_index(first).into()))
        .ok_or_else(out_of_range)?;
    // Sunday after the last week; exclusive.
    let grid_end = last
        .checked_sub_days(Days::new(weekday_index(last).into()))
        .and_then(|sunday| sunday.checked_add_days(Days::new(7)))
        .ok_or_else(out_of_range)?;
    let cells = usize::try_from((grid_end - grid_start).num_days()).map_err(|_| out_of_range())?;

    let days: Vec<CalendarDate> = grid_start.iter_days().take(cells).map(|date| CalendarDate {
        date,
        is_today:    same_day(date, today),
        is_selected: same_day(date, selected_date),
    }).collect();

    let weeks = days
        .chunks_exact(7)
        .filter_map(|chunk| <[CalendarDate; 7]>::try_from(chunk).ok())
        .map(WeekRow)
        .collect();

    Ok(CalendarGrid { month: first, weeks })
}

/// Moves `delta` months from `reference`, keeping the day of month where the
/// target month has it and clamping to its last day otherwise.
pub fn advance_month(reference: NaiveDate, delta: i32) -> Result<NaiveDate, DateError> {
    let months  = Months::new(delta.unsigned_abs());
    let shifted = if delta >= 0 {
        reference.checked_add_months(months)
    } else {
        reference.checked_sub_months(months)
    };
    shifted
        .ok_or_else(|| DateError::OutOfRange(format!("{reference} {delta:+} months")))
        .and_then(ensure_supported)
}

/// True when `candidate`'s month lies strictly after the month of `today`.
pub fn is_future_month(candidate: NaiveDate, today: NaiveDate) -> bool {
    month_key(candidate) > month_key(today)
}

/// True when `date` is inside the displayed month and not in the past.
pub fn is_selectable_day(date: NaiveDate, reference_month: NaiveDate, today: NaiveDate) -> bool {
    same_month(date, reference_month) && date >= today
}

pub fn month_name(m: u32) -> &'static str {
    u8::try_from(m).ok()
        .and_then(|m| Month::try_from(m).ok())
        .map_or("???", |m| m.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn february_2024_spans_five_weeks() {
        let grid = build_grid(d(2024, 2, 14), d(2024, 2, 14), d(2024, 2, 10)).unwrap();
        assert_eq!(grid.first_date(), Some(d(2024, 1, 28)));
        assert_eq!(grid.last_date(), Some(d(2024, 3, 2)));
        assert_eq!(grid.weeks().len(), 5);
        assert_eq!(grid.len(), 35);
        assert_eq!(grid.month(), d(2024, 2, 1));
    }

    #[test]
    fn september_2024_starts_on_the_first() {
        let grid = build_grid(d(2024, 9, 30), d(2024, 9, 1), d(2024, 9, 1)).unwrap();
        assert_eq!(grid.first_date(), Some(d(2024, 9, 1)));
        assert_eq!(grid.last_date(), Some(d(2024, 10, 5)));
        assert_eq!(grid.len(), 35);
    }

    #[test]
    fn four_and_six_week_months() {
        // February 2015 starts on a Sunday and has 28 days.
        let feb = build_grid(d(2015, 2, 1), d(2015, 2, 1), d(2015, 2, 1)).unwrap();
        assert_eq!(feb.weeks().len(), 4);
        assert_eq!(feb.first_date(), Some(d(2015, 2, 1)));
        assert_eq!(feb.last_date(), Some(d(2015, 2, 28)));

        // March 2024 starts on a Friday with 31 days.
        let mar = build_grid(d(2024, 3, 1), d(2024, 3, 1), d(2024, 3, 1)).unwrap();
        assert_eq!(mar.weeks().len(), 6);
        assert_eq!(mar.first_date(), Some(d(2024, 2, 25)));
        assert_eq!(mar.last_date(), Some(d(2024, 4, 6)));
    }

    #[test]
    fn rows_are_sunday_to_saturday() {
        let grid = build_grid(d(2024, 6, 1), d(2024, 6, 1), d(2024, 6, 1)).unwrap();
        for week in grid.weeks() {
            assert_eq!(weekday_index(week.sunday()), 0);
            assert_eq!(weekday_index(week.saturday()), 6);
        }
    }

    #[test]
    fn flags_follow_today_and_selection() {
        let grid = build_grid(d(2024, 2, 1), d(2024, 3, 1), d(2024, 1, 30)).unwrap();
        assert_eq!(grid.today().map(|c| c.date), Some(d(2024, 1, 30)));
        assert_eq!(grid.selected().map(|c| c.date), Some(d(2024, 3, 1)));
        assert_eq!(grid.cells().filter(|c| c.is_today).count(), 1);
        assert_eq!(grid.cells().filter(|c| c.is_selected).count(), 1);

        let elsewhere = build_grid(d(2024, 2, 1), d(2024, 5, 1), d(2023, 12, 25)).unwrap();
        assert!(elsewhere.today().is_none());
        assert!(elsewhere.selected().is_none());
    }

    #[test]
    fn today_and_selected_can_share_a_cell() {
        let grid = build_grid(d(2024, 2, 1), d(2024, 2, 8), d(2024, 2, 8)).unwrap();
        let cell = grid.cell(d(2024, 2, 8)).unwrap();
        assert!(cell.is_today && cell.is_selected);
    }

    #[test]
    fn contains_and_in_month() {
        let grid = build_grid(d(2024, 2, 1), d(2024, 2, 1), d(2024, 2, 1)).unwrap();
        assert!(grid.contains(d(2024, 1, 28)));
        assert!(!grid.contains(d(2024, 1, 27)));
        assert!(grid.contains(d(2024, 3, 2)));
        assert!(!grid.contains(d(2024, 3, 3)));
        assert!(grid.in_month(d(2024, 2, 29)));
        assert!(!grid.in_month(d(2024, 1, 28)));
    }

    #[test]
    fn grid_at_the_edges_of_the_supported_years() {
        let first = build_grid(d(1, 1, 1), d(1, 1, 1), d(1, 1, 1)).unwrap();
        assert_eq!(first.first_date(), Some(d(0, 12, 31)));
        let last = build_grid(d(9999, 12, 31), d(9999, 12, 31), d(9999, 12, 31)).unwrap();
        assert_eq!(last.last_date(), Some(d(10000, 1, 1)));
        assert_eq!(last.len() % 7, 0);
    }

    #[test]
    fn grid_rejects_months_outside_supported_years() {
        let max = NaiveDate::MAX;
        let min = NaiveDate::MIN;
        assert!(matches!(build_grid(max, max, max), Err(DateError::OutOfRange(_))));
        assert!(matches!(build_grid(min, min, min), Err(DateError::OutOfRange(_))));
        assert!(build_grid(d(10000, 1, 1), d(2024, 1, 1), d(2024, 1, 1)).is_err());
        // Only the reference month is range-checked.
        assert!(build_grid(d(2024, 1, 1), max, min).is_ok());
    }

    #[test]
    fn advance_month_clamps_day() {
        assert_eq!(advance_month(d(2024, 1, 31), 1).unwrap(), d(2024, 2, 29));
        assert_eq!(advance_month(d(2023, 1, 31), 1).unwrap(), d(2023, 2, 28));
        assert_eq!(advance_month(d(2024, 3, 31), -1).unwrap(), d(2024, 2, 29));
        assert_eq!(advance_month(d(2024, 5, 15), 0).unwrap(), d(2024, 5, 15));
        assert_eq!(advance_month(d(2024, 11, 30), 2).unwrap(), d(2025, 1, 30));
        assert_eq!(advance_month(d(2024, 1, 10), -13).unwrap(), d(2022, 12, 10));
    }

    #[test]
    fn advance_month_rejects_leaving_supported_range() {
        assert!(matches!(advance_month(d(9999, 12, 1), 1), Err(DateError::OutOfRange(_))));
        assert!(matches!(advance_month(d(1, 1, 1), -1), Err(DateError::OutOfRange(_))));
        assert!(advance_month(d(2024, 1, 1), i32::MAX).is_err());
    }

    #[test]
    fn future_month_is_strict() {
        assert!(is_future_month(d(2024, 4, 1), d(2024, 3, 31)));
        assert!(!is_future_month(d(2024, 3, 31), d(2024, 3, 1)));
        assert!(!is_future_month(d(2024, 2, 29), d(2024, 3, 1)));
        assert!(is_future_month(d(2025, 1, 1), d(2024, 12, 31)));
        assert!(!is_future_month(d(2023, 12, 1), d(2024, 1, 1)));
    }

    #[test]
    fn selectable_days() {
        let month = d(2024, 3, 1);
        let today = d(2024, 3, 10);
        assert!(is_selectable_day(d(2024, 3, 10), month, today));
        assert!(is_selectable_day(d(2024, 3, 31), month, today));
        assert!(!is_selectable_day(d(2024, 3, 9), month, today));
        assert!(!is_selectable_day(d(2024, 4, 1), month, today));
        assert!(!is_selectable_day(d(2024, 2, 29), month, d(2024, 2, 1)));
    }

    #[test]
    fn month_names_cover_the_year() {
        assert_eq!(month_name(d(2024, 2, 1).month()), "February");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(13), "???");
    }
}
