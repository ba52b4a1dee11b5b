//! The log time-range toolbar.
//!
//! [`LogToolbar`] keeps the custom range pickers, the calendar popover and the
//! reconciler together. The parent view owns the [`RangeSelection`] and the
//! [`QueryStore`] and lends them to the toolbar on each call.

use chrono::{DateTime, Utc};

use crate::config::ToolbarConfig;
use crate::error::ToolbarError;

pub mod custom_range;
pub mod datetime;
pub mod popover;
pub mod query;
pub mod range;
pub mod reconcile;

use custom_range::{Bound, CustomRangeState};
use popover::CalendarPopover;
use query::{NavigateOptions, NavigationQuery, QueryState, QueryStore};
use range::RangeSelection;
use reconcile::{ReclassifySettings, ReconcileOutcome, Reconciler};

pub const LOAD_OLDER_LABEL: &str = "Load older logs";
pub const ALL_PAST_LOADED_LABEL: &str = "All past logs within range loaded";
pub const LOAD_NEWER_LABEL: &str = "Load newer logs";

pub struct LogToolbar {
    pub custom: CustomRangeState,
    pub popover: CalendarPopover,
    reconciler: Reconciler,
    config: ToolbarConfig,
}

impl LogToolbar {
    pub fn new(config: ToolbarConfig, now: DateTime<Utc>) -> Self {
        let reconciler = Reconciler::new(ReclassifySettings {
            tolerance_secs: config.reclassify_tolerance_secs,
            policy: config.reclassify_policy,
        });
        Self {
            custom: CustomRangeState::new(now),
            popover: CalendarPopover::default(),
            reconciler,
            config,
        }
    }

    pub fn config(&self) -> &ToolbarConfig {
        &self.config
    }

    /// Bring the pickers (and possibly the selection) in line with the store.
    /// Cheap to call every frame.
    pub fn sync(
        &mut self,
        store: &impl QueryStore,
        selected: &mut RangeSelection,
        now: DateTime<Utc>,
    ) -> ReconcileOutcome {
        let query = store.read();
        self.reconciler
            .reconcile(&query, &mut self.custom, selected, now)
    }

    /// The user picked `range` in the selector. Presets navigate right away;
    /// custom waits for [`LogToolbar::search_custom`].
    pub fn select_range(
        &mut self,
        range: RangeSelection,
        selected: &mut RangeSelection,
        store: &mut impl QueryStore,
        now: DateTime<Utc>,
    ) -> Result<Option<NavigationQuery>, ToolbarError> {
        let Some(navigation) = range.navigation(now.timestamp(), self.config.page_size) else {
            *selected = range;
            return Ok(None);
        };
        log::debug!("{range} selected, navigating to {navigation:?}");
        write_navigation(store, &navigation)?;
        *selected = range;
        Ok(Some(navigation))
    }

    /// Same as [`LogToolbar::select_range`], from a selector label.
    pub fn select_label(
        &mut self,
        label: &str,
        selected: &mut RangeSelection,
        store: &mut impl QueryStore,
        now: DateTime<Utc>,
    ) -> Result<Option<NavigationQuery>, ToolbarError> {
        let range = label.parse::<RangeSelection>()?;
        self.select_range(range, selected, store, now)
    }

    /// The "Search" button of the custom range.
    pub fn search_custom(
        &mut self,
        store: &mut impl QueryStore,
    ) -> Result<NavigationQuery, ToolbarError> {
        let navigation = self
            .custom
            .navigation(self.config.page_size, self.config.validate_custom_range)?;
        log::debug!("custom range search, navigating to {navigation:?}");
        write_navigation(store, &navigation)?;
        self.popover.click_outside();
        Ok(navigation)
    }

    pub fn open_calendar(&mut self, bound: Bound) {
        self.popover.open(bound);
    }

    pub fn close_calendar(&mut self) {
        self.popover.click_outside();
    }

    pub fn field_display(&self, bound: Bound) -> String {
        self.custom.field(bound).display()
    }

    pub fn load_older_label(all_past_logs_loaded: bool) -> &'static str {
        if all_past_logs_loaded {
            ALL_PAST_LOADED_LABEL
        } else {
            LOAD_OLDER_LABEL
        }
    }

    pub fn load_older_enabled(all_past_logs_loaded: bool) -> bool {
        !all_past_logs_loaded
    }

    /// Enabled only once the user has paged back, i.e. `_offset > 0`.
    pub fn load_newer_enabled(query: &QueryState) -> bool {
        query.offset().is_some_and(|offset| offset > 0)
    }

    /// Invoke `load_older` if the button is enabled. Returns whether it ran.
    pub fn press_load_older(all_past_logs_loaded: bool, load_older: impl FnOnce()) -> bool {
        let enabled = Self::load_older_enabled(all_past_logs_loaded);
        if enabled {
            load_older();
        }
        enabled
    }

    pub fn press_load_newer(query: &QueryState, load_newer: impl FnOnce()) -> bool {
        let enabled = Self::load_newer_enabled(query);
        if enabled {
            load_newer();
        }
        enabled
    }
}

fn write_navigation(
    store: &mut impl QueryStore,
    navigation: &NavigationQuery,
) -> Result<(), ToolbarError> {
    store.navigate(&navigation.to_patch(), NavigateOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolbar::query::MemoryQueryStore;
    use crate::toolbar::range::RangePreset;

    fn at(ts: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(ts, 0).unwrap()
    }

    #[test]
    fn preset_selection_syncs_without_feedback() {
        let now = at(1_700_086_400);
        let mut toolbar = LogToolbar::new(ToolbarConfig::default(), now);
        let mut store = MemoryQueryStore::default();
        let mut selected = RangeSelection::Unset;

        toolbar.sync(&store, &mut selected, now);
        toolbar
            .select_range(
                RangeSelection::Preset(RangePreset::LastDay),
                &mut selected,
                &mut store,
                now,
            )
            .unwrap();

        assert!(matches!(
            toolbar.sync(&store, &mut selected, now),
            ReconcileOutcome::Applied { .. }
        ));
        assert_eq!(
            toolbar.sync(&store, &mut selected, now),
            ReconcileOutcome::Unchanged
        );
        assert_eq!(store.navigation_count(), 1);
        assert_eq!(selected, RangeSelection::Preset(RangePreset::LastDay));
    }

    #[test]
    fn selecting_custom_does_not_navigate() {
        let now = at(1_700_086_400);
        let mut toolbar = LogToolbar::new(ToolbarConfig::default(), now);
        let mut store = MemoryQueryStore::default();
        let mut selected = RangeSelection::Unset;

        let nav = toolbar
            .select_range(RangeSelection::Custom, &mut selected, &mut store, now)
            .unwrap();
        assert!(nav.is_none());
        assert_eq!(selected, RangeSelection::Custom);
        assert_eq!(store.navigation_count(), 0);
    }

    #[test]
    fn unknown_label_fails_before_touching_state() {
        let now = at(1_700_086_400);
        let mut toolbar = LogToolbar::new(ToolbarConfig::default(), now);
        let mut store = MemoryQueryStore::default();
        let mut selected = RangeSelection::Unset;

        let err = toolbar
            .select_label("Last decade", &mut selected, &mut store, now)
            .unwrap_err();
        assert_eq!(err, ToolbarError::UnknownRange("Last decade".to_string()));
        assert_eq!(selected, RangeSelection::Unset);
        assert_eq!(store.navigation_count(), 0);
    }

    struct RejectingStore;

    impl QueryStore for RejectingStore {
        fn read(&self) -> QueryState {
            QueryState::new()
        }

        fn navigate(&mut self, _: &QueryState, _: NavigateOptions) -> Result<(), ToolbarError> {
            Err(ToolbarError::Store("read-only".to_string()))
        }
    }

    #[test]
    fn rejected_preset_keeps_previous_selection() {
        let now = at(1_700_086_400);
        let mut toolbar = LogToolbar::new(ToolbarConfig::default(), now);
        let mut selected = RangeSelection::Custom;

        let err = toolbar
            .select_range(
                RangeSelection::Preset(RangePreset::LastHour),
                &mut selected,
                &mut RejectingStore,
                now,
            )
            .unwrap_err();
        assert_eq!(err, ToolbarError::Store("read-only".to_string()));
        assert_eq!(selected, RangeSelection::Custom);
    }

    #[test]
    fn search_closes_the_popover() {
        let now = at(1_700_086_400);
        let mut toolbar = LogToolbar::new(ToolbarConfig::default(), now);
        let mut store = MemoryQueryStore::default();

        toolbar.open_calendar(Bound::Start);
        toolbar.custom.start.date = chrono::NaiveDate::from_ymd_opt(2023, 11, 1);
        toolbar.search_custom(&mut store).unwrap();
        assert_eq!(toolbar.popover, CalendarPopover::Closed);
    }

    #[test]
    fn pagination_buttons() {
        assert!(!LogToolbar::load_older_enabled(true));
        assert!(LogToolbar::load_older_enabled(false));
        assert_eq!(LogToolbar::load_older_label(true), ALL_PAST_LOADED_LABEL);

        let mut calls = 0;
        assert!(!LogToolbar::press_load_older(true, || calls += 1));
        assert!(LogToolbar::press_load_older(false, || calls += 1));
        assert_eq!(calls, 1);

        for (query, enabled) in [
            ("", false),
            ("_offset=0", false),
            ("_offset=-20", false),
            ("_offset=abc", false),
            ("_offset=20", true),
        ] {
            let q = QueryState::parse_query_string(query);
            assert_eq!(LogToolbar::load_newer_enabled(&q), enabled, "{query}");
        }
    }
}
