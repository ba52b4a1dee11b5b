use thiserror::Error;

use crate::toolbar::custom_range::Bound;

/// Errors raised by the time-range toolbar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolbarError {
    /// A range label that is not one of the known selections. This is a
    /// programming error on the caller's side (the selector only offers
    /// known labels), so it is never shown to the user as-is.
    #[error("unknown time range {0:?}")]
    UnknownRange(String),

    #[error("the {0} date of the custom range is not set")]
    MissingDate(Bound),

    #[error("invalid time of day {hour:?}:{minute:?}")]
    InvalidTime { hour: String, minute: String },

    #[error("invalid ISO date/time {0:?}")]
    InvalidIso(String),

    #[error("query store rejected navigation: {0}")]
    Store(String),
}
