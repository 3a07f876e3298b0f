use chrono::NaiveDate;
use thiserror::Error;

/// Dates rejected before they reach the grid builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid date {input:?}: {reason}")]
    Invalid { input: String, reason: String },

    #[error("date out of supported range (years 1-9999): {0}")]
    OutOfRange(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickerError {
    #[error(transparent)]
    Date(#[from] DateError),

    #[error("{0} cannot be selected from the displayed month")]
    NotSelectable(NaiveDate),
}
