use chrono::NaiveDate;
use serde::Deserialize;

use crate::calendar::{advance_month, build_grid, is_future_month, is_selectable_day, CalendarGrid};
use crate::date::ensure_supported;
use crate::error::PickerError;

// ─── Policy ───────────────────────────────────────────────────────────────────

/// Selection and navigation rules layered on top of the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavigationPolicy {
    /// Refuse to step the view into a month that lies after today's.
    pub block_future_months: bool,
    /// Only allow picking days of the displayed month, today or later.
    pub restrict_selection:  bool,
}

// ─── Picker state ─────────────────────────────────────────────────────────────

/// Caller-side state of a date picker: the displayed month, the selected
/// day and whether the calendar is open. The grid is rebuilt from scratch
/// after every change.
#[derive(Debug, Clone)]
pub struct DatePicker {
    view:     NaiveDate,
    selected: NaiveDate,
    today:    NaiveDate,
    open:     bool,
    policy:   NavigationPolicy,
    grid:     CalendarGrid,
}

impl DatePicker {
    pub fn new(today: NaiveDate, policy: NavigationPolicy) -> Result<Self, PickerError> {
        let today = ensure_supported(today)?;
        Ok(Self {
            view:     today,
            selected: today,
            today,
            open:     false,
            policy,
            grid:     build_grid(today, today, today)?,
        })
    }

    pub fn grid(&self)     -> &CalendarGrid     { &self.grid }
    pub fn view(&self)     -> NaiveDate         { self.view }
    pub fn selected(&self) -> NaiveDate         { self.selected }
    pub fn today(&self)    -> NaiveDate         { self.today }
    pub fn is_open(&self)  -> bool              { self.open }
    pub fn policy(&self)   -> NavigationPolicy  { self.policy }

    // ── Navigation ────────────────────────────────────────────────────────────

    pub fn prev_month(&mut self) -> Result<(), PickerError> {
        let target = advance_month(self.view, -1)?;
        self.rebuild(target, self.selected, self.today)
    }

    /// Steps forward one month. Returns `Ok(false)` when the policy keeps
    /// the view out of future months.
    pub fn next_month(&mut self) -> Result<bool, PickerError> {
        let target = advance_month(self.view, 1)?;
        if self.policy.block_future_months && is_future_month(target, self.today) {
            tracing::debug!("next month {target} blocked (today {})", self.today);
            return Ok(false);
        }
        self.rebuild(target, self.selected, self.today)?;
        Ok(true)
    }

    pub fn can_go_next(&self) -> bool {
        if !self.policy.block_future_months {
            return true;
        }
        match advance_month(self.view, 1) {
            Ok(target) => !is_future_month(target, self.today),
            Err(_)     => false,
        }
    }

    pub fn jump_to_today(&mut self) -> Result<(), PickerError> {
        self.rebuild(self.today, self.selected, self.today)
    }

    /// Day rollover: the view and selection stay where they are.
    pub fn set_today(&mut self, today: NaiveDate) -> Result<(), PickerError> {
        let today = ensure_supported(today)?;
        self.rebuild(self.view, self.selected, today)
    }

    // ── Selection ─────────────────────────────────────────────────────────────

    pub fn is_selectable(&self, date: NaiveDate) -> bool {
        !self.policy.restrict_selection || is_selectable_day(date, self.view, self.today)
    }

    /// Marks `date` as selected and closes the calendar.
    pub fn select(&mut self, date: NaiveDate) -> Result<(), PickerError> {
        let date = ensure_supported(date)?;
        if !self.is_selectable(date) {
            tracing::warn!("rejected selection {date} in view {}", self.view);
            return Err(PickerError::NotSelectable(date));
        }
        self.rebuild(self.view, date, self.today)?;
        self.open = false;
        Ok(())
    }

    pub fn selected_label(&self, format: &str) -> String {
        self.selected.format(format).to_string()
    }

    // ── Visibility ────────────────────────────────────────────────────────────

    pub fn open(&mut self) { self.open = true; }

    pub fn toggle(&mut self) { self.open = !self.open; }

    /// Closes the calendar, e.g. on a click outside of it.
    pub fn dismiss(&mut self) { self.open = false; }

    /// State only changes once the new grid has been built.
    fn rebuild(&mut self, view: NaiveDate, selected: NaiveDate, today: NaiveDate) -> Result<(), PickerError> {
        self.grid     = build_grid(view, selected, today)?;
        self.view     = view;
        self.selected = selected;
        self.today    = today;
        tracing::debug!(
            "grid rebuilt for {}: {} weeks, selected {}",
            self.grid.month().format("%Y-%m"), self.grid.weeks().len(), self.selected,
        );
        Ok(())
    }
}
