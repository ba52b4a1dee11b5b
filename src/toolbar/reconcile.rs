//! Derives the toolbar's display state from the external query state.
//!
//! The query state is the source of truth. Each call to
//! [`Reconciler::reconcile`] compares the freshly read snapshot against the
//! last one it acted on and only refreshes the pickers (and possibly the range
//! selection) when the two differ. Reads that return an equal snapshot are
//! no-ops, so writes made by the toolbar itself settle after one pass.

use chrono::{DateTime, Utc};

use crate::toolbar::custom_range::{Bound, CustomRangeState};
use crate::toolbar::datetime::{ceil_unix_seconds, decompose_timestamp};
use crate::toolbar::query::{END_TIMESTAMP_PARAM, ParamValue, QueryState, START_TIMESTAMP_PARAM};
use crate::toolbar::range::{RangePreset, RangeSelection, ReclassifyPolicy, matching_preset};

pub type QueryEquality = fn(&QueryState, &QueryState) -> bool;

fn deep_equal(a: &QueryState, b: &QueryState) -> bool {
    a == b
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReclassifySettings {
    pub tolerance_secs: i64,
    pub policy: ReclassifyPolicy,
}

impl Default for ReclassifySettings {
    fn default() -> Self {
        Self {
            tolerance_secs: 60,
            policy: ReclassifyPolicy::LastDayOnly,
        }
    }
}

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The query state matched the last one seen.
    Unchanged,
    Applied {
        start: FieldUpdate,
        end: FieldUpdate,
        reclassified: Option<RangePreset>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Parameter absent, field left alone.
    Untouched,
    Updated,
    /// Parameter present but unusable, field date cleared.
    Cleared,
}

#[derive(Debug, Clone)]
pub struct Reconciler {
    last_seen: Option<QueryState>,
    equal: QueryEquality,
    settings: ReclassifySettings,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(ReclassifySettings::default())
    }
}

impl Reconciler {
    pub fn new(settings: ReclassifySettings) -> Self {
        Self {
            last_seen: None,
            equal: deep_equal,
            settings,
        }
    }

    /// Replace the change-detection predicate.
    pub fn with_equality(mut self, equal: QueryEquality) -> Self {
        self.equal = equal;
        self
    }

    pub fn reconcile(
        &mut self,
        query: &QueryState,
        custom: &mut CustomRangeState,
        selected: &mut RangeSelection,
        now: DateTime<Utc>,
    ) -> ReconcileOutcome {
        if let Some(previous) = &self.last_seen {
            if (self.equal)(previous, query) {
                return ReconcileOutcome::Unchanged;
            }
        }
        self.last_seen = Some(query.clone());

        let start = apply_timestamp(query, START_TIMESTAMP_PARAM, Bound::Start, custom);

        let mut reclassified = None;
        if let (FieldUpdate::Updated, ParamValue::Valid(start_timestamp)) =
            (start, query.start_timestamp())
        {
            reclassified = matching_preset(
                start_timestamp,
                ceil_unix_seconds(now),
                self.settings.tolerance_secs,
                self.settings.policy,
            );
            if let Some(preset) = reclassified {
                log::debug!("start_timestamp {start_timestamp} matches {}", preset.label());
                *selected = RangeSelection::Preset(preset);
            }
        }

        let end = apply_timestamp(query, END_TIMESTAMP_PARAM, Bound::End, custom);

        ReconcileOutcome::Applied {
            start,
            end,
            reclassified,
        }
    }
}

fn apply_timestamp(
    query: &QueryState,
    key: &str,
    bound: Bound,
    custom: &mut CustomRangeState,
) -> FieldUpdate {
    let field = custom.field_mut(bound);
    match query.timestamp(key) {
        ParamValue::Absent => FieldUpdate::Untouched,
        ParamValue::Valid(ts) => match decompose_timestamp(ts) {
            Some(parts) => {
                field.set(parts);
                FieldUpdate::Updated
            }
            None => {
                log::warn!("{key}={ts} is out of range, clearing the {bound} date");
                field.clear();
                FieldUpdate::Cleared
            }
        },
        ParamValue::Malformed(raw) => {
            log::warn!("{key}={raw} is not a timestamp, clearing the {bound} date");
            field.clear();
            FieldUpdate::Cleared
        }
    }
}
