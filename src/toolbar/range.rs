use std::fmt;
use std::str::FromStr;

use crate::error::ToolbarError;
use crate::toolbar::query::NavigationQuery;

/// A fixed-duration window ending "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangePreset {
    LastHour,
    LastDay,
    LastWeek,
    Last30Days,
}

impl RangePreset {
    pub const ALL: [RangePreset; 4] = [
        RangePreset::LastHour,
        RangePreset::LastDay,
        RangePreset::LastWeek,
        RangePreset::Last30Days,
    ];

    pub const fn duration_secs(self) -> i64 {
        match self {
            RangePreset::LastHour => 60 * 60,
            RangePreset::LastDay => 24 * 60 * 60,
            RangePreset::LastWeek => 7 * 24 * 60 * 60,
            RangePreset::Last30Days => 30 * 24 * 60 * 60,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RangePreset::LastHour => "Last hour",
            RangePreset::LastDay => "Last day",
            RangePreset::LastWeek => "Last week",
            RangePreset::Last30Days => "Last 30 days",
        }
    }

    /// Start of the window for a reference time; the end is "now" and is
    /// left out of the query.
    pub const fn resolve(self, now_unix_seconds: i64) -> i64 {
        now_unix_seconds - self.duration_secs()
    }
}

/// What the range selector currently shows.
///
/// Owned by the parent view, the toolbar only reads it and proposes changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RangeSelection {
    #[default]
    Unset,
    Preset(RangePreset),
    /// Timestamps come from the start/end pickers.
    Custom,
}

impl RangeSelection {
    pub const CUSTOM_LABEL: &'static str = "Custom range";
    pub const PLACEHOLDER: &'static str = "Select time range";

    /// Every selectable entry, in selector order.
    pub fn options() -> impl Iterator<Item = RangeSelection> {
        RangePreset::ALL
            .into_iter()
            .map(RangeSelection::Preset)
            .chain(std::iter::once(RangeSelection::Custom))
    }

    pub fn label(&self) -> &'static str {
        match self {
            RangeSelection::Unset => Self::PLACEHOLDER,
            RangeSelection::Preset(preset) => preset.label(),
            RangeSelection::Custom => Self::CUSTOM_LABEL,
        }
    }

    pub fn preset(&self) -> Option<RangePreset> {
        match self {
            RangeSelection::Preset(preset) => Some(*preset),
            _ => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, RangeSelection::Custom)
    }

    /// The navigation a preset selection issues: open-ended window starting
    /// `duration` seconds before `now`, pagination reset to the first page.
    ///
    /// `None` for `Custom` and `Unset`, which never navigate on selection.
    pub fn navigation(&self, now_unix_seconds: i64, page_size: u32) -> Option<NavigationQuery> {
        self.preset().map(|preset| NavigationQuery {
            start_timestamp: preset.resolve(now_unix_seconds),
            end_timestamp: None,
            limit: page_size,
            offset: 0,
        })
    }
}

impl fmt::Display for RangeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RangeSelection {
    type Err = ToolbarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::CUSTOM_LABEL {
            return Ok(RangeSelection::Custom);
        }
        RangePreset::ALL
            .into_iter()
            .find(|preset| preset.label() == s)
            .map(RangeSelection::Preset)
            .ok_or_else(|| ToolbarError::UnknownRange(s.to_string()))
    }
}

/// Which presets the reconciler may infer from a bare `start_timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReclassifyPolicy {
    /// Only "Last day" is recognised.
    #[default]
    LastDayOnly,
    AllPresets,
}

impl ReclassifyPolicy {
    fn candidates(self) -> &'static [RangePreset] {
        match self {
            ReclassifyPolicy::LastDayOnly => &[RangePreset::LastDay],
            ReclassifyPolicy::AllPresets => &RangePreset::ALL,
        }
    }
}

/// The preset whose duration matches `now - start` within `tolerance_secs`
/// (inclusive), if any.
pub fn matching_preset(
    start_timestamp: i64,
    now_unix_seconds: i64,
    tolerance_secs: i64,
    policy: ReclassifyPolicy,
) -> Option<RangePreset> {
    let seconds_ago = now_unix_seconds.checked_sub(start_timestamp)?;
    policy.candidates().iter().copied().find(|preset| {
        seconds_ago
            .checked_sub(preset.duration_secs())
            .and_then(i64::checked_abs)
            .is_some_and(|distance| distance <= tolerance_secs)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_subtracts_duration() {
        let now = 1_700_003_600;
        for preset in RangePreset::ALL {
            assert_eq!(preset.resolve(now), now - preset.duration_secs());
        }
        assert_eq!(RangePreset::LastHour.resolve(now), 1_700_000_000);
    }

    #[test]
    fn labels_parse_back() {
        for selection in RangeSelection::options() {
            assert_eq!(selection.label().parse::<RangeSelection>(), Ok(selection));
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert_eq!(
            "Last year".parse::<RangeSelection>(),
            Err(ToolbarError::UnknownRange("Last year".to_string()))
        );
        assert!(RangeSelection::PLACEHOLDER.parse::<RangeSelection>().is_err());
    }

    #[test]
    fn custom_and_unset_do_not_navigate() {
        assert!(RangeSelection::Custom.navigation(100, 20).is_none());
        assert!(RangeSelection::Unset.navigation(100, 20).is_none());
    }

    #[test]
    fn preset_navigation_is_open_ended() {
        let nav = RangeSelection::Preset(RangePreset::LastHour)
            .navigation(1_700_003_600, 20)
            .unwrap();
        assert_eq!(nav.start_timestamp, 1_700_000_000);
        assert_eq!(nav.end_timestamp, None);
        assert_eq!(nav.limit, 20);
        assert_eq!(nav.offset, 0);
    }

    #[test]
    fn last_day_matches_within_tolerance() {
        let now = 1_700_086_400;
        let policy = ReclassifyPolicy::LastDayOnly;
        assert_eq!(
            matching_preset(now - 86_400, now, 60, policy),
            Some(RangePreset::LastDay)
        );
        assert_eq!(
            matching_preset(now - 86_460, now, 60, policy),
            Some(RangePreset::LastDay)
        );
        assert_eq!(
            matching_preset(now - 86_340, now, 60, policy),
            Some(RangePreset::LastDay)
        );
        assert_eq!(matching_preset(now - 86_461, now, 60, policy), None);
        assert_eq!(matching_preset(now - 90_000, now, 60, policy), None);
    }

    #[test]
    fn extreme_starts_never_match() {
        let now = 1_700_086_400;
        for policy in [ReclassifyPolicy::LastDayOnly, ReclassifyPolicy::AllPresets] {
            assert_eq!(matching_preset(i64::MIN, now, 60, policy), None);
            assert_eq!(matching_preset(i64::MAX, now, 60, policy), None);
            assert_eq!(matching_preset(i64::MIN + 1, now, 60, policy), None);
        }
    }

    #[test]
    fn last_day_only_ignores_other_presets() {
        let now = 1_700_086_400;
        assert_eq!(
            matching_preset(now - 3_600, now, 60, ReclassifyPolicy::LastDayOnly),
            None
        );
        assert_eq!(
            matching_preset(now - 3_600, now, 60, ReclassifyPolicy::AllPresets),
            Some(RangePreset::LastHour)
        );
        assert_eq!(
            matching_preset(now - 604_800, now, 60, ReclassifyPolicy::AllPresets),
            Some(RangePreset::LastWeek)
        );
    }
}
