use std::sync::mpsc::{Receiver, TryRecvError};

use chrono::Utc;
use eframe::egui;

use lumberjack_range::config::{AppConfig, AwsConfig};
use lumberjack_range::toolbar::query::{
    LIMIT_PARAM, MemoryQueryStore, NavigateOptions, OFFSET_PARAM, QueryState, QueryStore,
};
use lumberjack_range::{LogToolbar, RangeSelection, ToolbarError};

use crate::aws::{AwsLogError, LogPage};
use crate::worker::{WorkerHandle, WorkerRequest};

pub mod state;
pub mod status_bar;
pub mod ui_logs;
pub mod ui_toolbar;
pub mod ui_top;

use state::{LogsViewState, Theme, non_empty};

/// The log view. It owns the query state and the range selection, and
/// re-fetches whenever the query state changes.
pub struct App {
    pub(crate) logs_view: LogsViewState,
    pub(crate) last_error: Option<String>,
    pub(crate) last_info: Option<String>,
    pub(crate) is_fetching: bool,
    pub(crate) fetch_rx: Option<Receiver<Result<LogPage, AwsLogError>>>,
    pub(crate) groups_rx: Option<Receiver<Result<Vec<String>, AwsLogError>>>,
    pub(crate) worker: WorkerHandle,
    pub(crate) theme: Theme,
    pub(crate) is_loading_groups: bool,

    pub(crate) store: MemoryQueryStore,
    pub(crate) toolbar: LogToolbar,
    pub(crate) selected_range: RangeSelection,
    /// Query state the entries on screen were fetched for.
    pub(crate) fetched_query: Option<QueryState>,
    aws: AwsConfig,
}

impl App {
    pub fn new(_cc: &eframe::CreationContext<'_>, worker: WorkerHandle, config: AppConfig) -> Self {
        let store = MemoryQueryStore::from_query_string(
            config.initial_query.as_deref().unwrap_or_default(),
        );
        Self {
            logs_view: LogsViewState::from_config(&config.aws),
            last_error: None,
            last_info: None,
            is_fetching: false,
            fetch_rx: None,
            groups_rx: None,
            worker,
            theme: Theme::Dark,
            is_loading_groups: false,
            store,
            toolbar: LogToolbar::new(config.toolbar, Utc::now()),
            selected_range: RangeSelection::default(),
            fetched_query: None,
            aws: config.aws,
        }
    }

    fn page_size(&self) -> u32 {
        self.toolbar.config().page_size
    }

    pub(crate) fn select_range(&mut self, range: RangeSelection) {
        let result =
            self.toolbar
                .select_range(range, &mut self.selected_range, &mut self.store, Utc::now());
        self.report(result.map(|_| ()));
    }

    pub(crate) fn search_custom_range(&mut self) {
        let result = self.toolbar.search_custom(&mut self.store);
        self.report(result.map(|_| ()));
    }

    /// Step one page further into the past.
    pub(crate) fn load_past_log_interval(&mut self) {
        let offset = self.current_offset() + i64::from(self.page_size());
        self.navigate_to_offset(offset);
    }

    pub(crate) fn load_newer_log_interval(&mut self) {
        let offset = (self.current_offset() - i64::from(self.page_size())).max(0);
        self.navigate_to_offset(offset);
    }

    fn current_offset(&self) -> i64 {
        self.store.read().offset().unwrap_or(0).max(0)
    }

    fn navigate_to_offset(&mut self, offset: i64) {
        let mut patch = QueryState::new();
        patch.set(LIMIT_PARAM, self.page_size());
        patch.set(OFFSET_PARAM, offset);
        let result = self.store.navigate(&patch, NavigateOptions::default());
        self.report(result);
    }

    /// Re-run the fetch for the current query state.
    pub(crate) fn refresh(&mut self) {
        self.fetched_query = None;
    }

    fn report(&mut self, result: Result<(), ToolbarError>) {
        match result {
            Ok(()) => self.last_error = None,
            Err(err) => {
                log::warn!("toolbar: {err}");
                self.last_error = Some(err.to_string());
            }
        }
    }

    fn maybe_fetch(&mut self) {
        if self.is_fetching {
            return;
        }
        let query = self.store.read();
        if self.fetched_query.as_ref() == Some(&query) {
            return;
        }
        if self.start_fetch_logs(&query) {
            self.fetched_query = Some(query);
        }
    }

    fn start_fetch_logs(&mut self, query: &QueryState) -> bool {
        let Some(log_group) = non_empty(&self.logs_view.log_group) else {
            return false;
        };
        self.logs_view.log_group = log_group.clone();

        let limit = query
            .limit()
            .and_then(|limit| usize::try_from(limit).ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(self.page_size() as usize);
        let offset = query
            .offset()
            .and_then(|offset| usize::try_from(offset).ok())
            .unwrap_or(0);

        self.is_fetching = true;
        self.last_error = None;

        let (tx, rx) = std::sync::mpsc::channel::<Result<LogPage, AwsLogError>>();

        self.worker.send(WorkerRequest::FetchLogPage {
            profile: non_empty(&self.logs_view.profile),
            region: non_empty(&self.logs_view.region),
            log_group,
            filter_pattern: self.logs_view.filter_pattern(),
            start_timestamp: query.start_timestamp().valid(),
            end_timestamp: query.end_timestamp().valid(),
            limit,
            offset,
            max_events: self.aws.max_events,
            respond_to: tx,
        });

        self.fetch_rx = Some(rx);
        true
    }

    pub(crate) fn start_load_log_groups(&mut self) {
        self.logs_view.available_groups.clear();
        self.logs_view.selected_group_index = None;
        self.last_error = None;

        self.is_loading_groups = true;

        let (tx, rx) = std::sync::mpsc::channel::<Result<Vec<String>, AwsLogError>>();

        self.worker.send(WorkerRequest::ListLogGroups {
            profile: non_empty(&self.logs_view.profile),
            region: non_empty(&self.logs_view.region),
            limit: 50,
            respond_to: tx,
        });

        self.groups_rx = Some(rx);
    }

    fn poll_workers(&mut self) {
        if let Some(rx) = self.fetch_rx.as_ref() {
            match rx.try_recv() {
                Ok(Ok(page)) => {
                    self.last_info = Some(format!("Loaded {} entries", page.entries.len()));
                    self.logs_view.entries = page.entries;
                    self.logs_view.all_past_logs_loaded = page.all_past_loaded;
                    self.is_fetching = false;
                    self.fetch_rx = None;
                }
                Ok(Err(err)) => {
                    log::error!("fetch failed: {err}");
                    self.last_error = Some(format!("{err}"));
                    self.is_fetching = false;
                    self.fetch_rx = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.is_fetching = false;
                    self.fetch_rx = None;
                }
            }
        }

        if let Some(rx) = self.groups_rx.as_ref() {
            match rx.try_recv() {
                Ok(Ok(groups)) => {
                    self.logs_view.available_groups = groups;
                    self.groups_rx = None;
                    self.is_loading_groups = false;
                }
                Ok(Err(err)) => {
                    log::error!("listing log groups failed: {err}");
                    self.last_error = Some(format!("{err}"));
                    self.groups_rx = None;
                    self.is_loading_groups = false;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.groups_rx = None;
                    self.is_loading_groups = false;
                }
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        match self.theme {
            Theme::Light => ctx.set_visuals(egui::Visuals::light()),
            Theme::Dark => ctx.set_visuals(egui::Visuals::dark()),
            Theme::RetroGreen => {
                let mut visuals = egui::Visuals::dark();
                visuals.override_text_color = Some(egui::Color32::from_rgb(0x00, 0xff, 0x66));
                visuals.panel_fill = egui::Color32::BLACK;
                visuals.extreme_bg_color = egui::Color32::BLACK;
                visuals.widgets.inactive.bg_fill = egui::Color32::from_rgb(0x00, 0x20, 0x00);
                visuals.widgets.hovered.bg_fill = egui::Color32::from_rgb(0x00, 0x40, 0x00);
                visuals.widgets.active.bg_fill = egui::Color32::from_rgb(0x00, 0x60, 0x00);
                ctx.set_visuals(visuals);
            }
        }

        self.poll_workers();

        // The query state may have moved (toolbar, pagination, back/forward).
        self.toolbar
            .sync(&self.store, &mut self.selected_range, Utc::now());
        self.maybe_fetch();

        if self.is_fetching || self.is_loading_groups {
            ctx.request_repaint();
        }

        ui_top::draw_top_bar(self, ctx);

        egui::TopBottomPanel::top("time_range_toolbar").show(ctx, |ui| {
            ui_toolbar::draw_toolbar(self, ui);
        });

        status_bar::draw_status_bar(self, ctx);

        egui::CentralPanel::default().show(ctx, |ui| ui_logs::draw_logs_view(self, ui));
    }
}
