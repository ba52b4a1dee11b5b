use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ToolbarError;
use crate::toolbar::datetime::{
    DateParts, TimeOfDay, format_for_display, iso_date_format, unix_timestamp_from_iso,
};
use crate::toolbar::query::NavigationQuery;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Start => f.write_str("start"),
            Bound::End => f.write_str("end"),
        }
    }
}

/// One side of the custom range. Without a date the field is unspecified and
/// its time of day is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateTimeField {
    pub date: Option<NaiveDate>,
    pub time: TimeOfDay,
}

impl DateTimeField {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
    }

    pub fn set(&mut self, parts: DateParts) {
        self.date = Some(parts.date);
        self.time = parts.time;
    }

    pub fn clear(&mut self) {
        self.date = None;
    }

    /// Text for the input box; empty when no date is set.
    pub fn display(&self) -> String {
        self.date
            .map(|date| format_for_display(date, self.time))
            .unwrap_or_default()
    }

    fn timestamp(&self, bound: Bound, validate: bool) -> Result<i64, ToolbarError> {
        let date = match (self.date, validate) {
            (Some(date), _) => date,
            (None, true) => return Err(ToolbarError::MissingDate(bound)),
            (None, false) => NaiveDate::default(),
        };
        unix_timestamp_from_iso(&iso_date_format(date, self.time))
    }
}

/// The two pickers of the custom range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomRangeState {
    pub start: DateTimeField,
    pub end: DateTimeField,
}

impl CustomRangeState {
    /// Start has no date and midnight; end is today at the current UTC time.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            start: DateTimeField {
                date: None,
                time: TimeOfDay::MIDNIGHT,
            },
            end: DateTimeField {
                date: Some(now.date_naive()),
                time: TimeOfDay::of(now),
            },
        }
    }

    pub fn field(&self, bound: Bound) -> &DateTimeField {
        match bound {
            Bound::Start => &self.start,
            Bound::End => &self.end,
        }
    }

    pub fn field_mut(&mut self, bound: Bound) -> &mut DateTimeField {
        match bound {
            Bound::Start => &mut self.start,
            Bound::End => &mut self.end,
        }
    }

    /// Build the search navigation for the custom range.
    ///
    /// With `validate` off an unset date silently becomes 1970-01-01.
    pub fn navigation(
        &self,
        page_size: u32,
        validate: bool,
    ) -> Result<NavigationQuery, ToolbarError> {
        let start_timestamp = self.start.timestamp(Bound::Start, validate)?;
        let end_timestamp = self.end.timestamp(Bound::End, validate)?;
        Ok(NavigationQuery {
            start_timestamp,
            end_timestamp: Some(end_timestamp),
            limit: page_size,
            offset: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> DateTime<Utc> {
        // 2024-01-02 10:30:15 UTC
        DateTime::<Utc>::from_timestamp(1_704_191_415, 0).unwrap()
    }

    #[test]
    fn defaults() {
        let state = CustomRangeState::new(now());
        assert!(state.start.is_empty());
        assert_eq!(state.start.time, TimeOfDay::MIDNIGHT);
        assert_eq!(state.end.date, Some(date(2024, 1, 2)));
        assert_eq!(state.end.time, TimeOfDay::new(10, 30).unwrap());
        assert_eq!(state.start.display(), "");
        assert_eq!(state.end.display(), "2024-01-02 10:30");
    }

    #[test]
    fn full_days_are_86400_apart() {
        let mut state = CustomRangeState::new(now());
        state.start.date = Some(date(2024, 1, 1));
        state.end.date = Some(date(2024, 1, 2));
        state.end.time = TimeOfDay::MIDNIGHT;

        let nav = state.navigation(20, true).unwrap();
        assert_eq!(nav.start_timestamp, 1_704_067_200);
        assert_eq!(nav.end_timestamp, Some(1_704_067_200 + 86_400));
        assert_eq!(nav.limit, 20);
        assert_eq!(nav.offset, 0);
    }

    #[test]
    fn missing_start_date_is_rejected_when_validating() {
        let state = CustomRangeState::new(now());
        assert_eq!(
            state.navigation(20, true),
            Err(ToolbarError::MissingDate(Bound::Start))
        );
    }

    #[test]
    fn missing_date_falls_back_to_epoch_without_validation() {
        let state = CustomRangeState::new(now());
        let nav = state.navigation(20, false).unwrap();
        assert_eq!(nav.start_timestamp, 0);
        assert_eq!(nav.end_timestamp, Some(1_704_191_400));
    }
}
