//! Calendar date-picker core.
//!
//! [`calendar::build_grid`] turns a reference month into Sunday-start week
//! rows with the today/selected flags set; [`picker::DatePicker`] keeps the
//! displayed month and selection between calls.

pub mod calendar;
pub mod config;
pub mod date;
pub mod error;
pub mod picker;

pub use calendar::{
    advance_month, build_grid, is_future_month, is_selectable_day, CalendarDate, CalendarGrid,
    WeekRow,
};
pub use error::{DateError, PickerError};
pub use picker::{DatePicker, NavigationPolicy};
