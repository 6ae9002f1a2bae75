//! Application state (Model in TEA pattern)

use tflens_core::{EntryId, LogEntry, LogFilters, LogsPage, PairingMode, RunId};

use crate::config::Settings;
use crate::context::{RequestContext, TimelineContext};
use crate::dialog::GroupDialog;
use crate::filter_form::FilterForm;
use crate::store::{SelectionScope, SelectionSnapshot, SelectionStore};
use crate::timeline::{TimelineGeometry, TimelineView};
use crate::view::{self, ViewTree};

const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

/// Smallest and largest page size the view accepts
pub const PAGE_SIZE_RANGE: (u32, u32) = (10, 500);

/// Application lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Running,
    Quitting,
}

/// Current UI mode/screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    /// Log view has focus
    #[default]
    Normal,
    /// Timeline chart has focus
    Timeline,
    /// Filter form is open
    FilterForm,
    /// Typing a run id
    RunInput,
    /// Export or display group dialog is open
    Dialog,
    /// Entry detail popup
    Detail,
    /// Blocking message box; every key dismisses it
    Blocking,
}

/// Load state of the log page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogsStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Complete application state
#[derive(Debug)]
pub struct AppState {
    pub phase: AppPhase,
    pub ui_mode: UiMode,
    /// Mode to return to when the blocking message closes
    pub(crate) mode_before_block: UiMode,

    pub settings: Settings,
    pub store: SelectionStore,

    // Request-determining state; see `request_context`
    pub run_id: Option<RunId>,
    pub pairing: PairingMode,
    pub page: u32,
    pub page_size: u32,
    pub include_pairs: bool,
    pub group_rows: bool,
    pub filters: LogFilters,

    pub page_data: Option<LogsPage>,
    pub logs_status: LogsStatus,
    /// Index into `view().lines()`
    pub cursor: usize,
    pub detail: Option<EntryId>,

    pub timeline_pairing: PairingMode,
    pub timeline: TimelineView,
    pub timeline_cursor: usize,

    pub dialog: Option<GroupDialog>,
    pub filter_form: Option<FilterForm>,
    pub run_input: String,

    pub blocking: Option<String>,
    /// Inline status text (fetch errors, export results)
    pub status_message: Option<String>,
    pub exports_in_flight: usize,
    pub spinner_frame: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// State with default settings and an in-memory store
    pub fn new() -> Self {
        Self::with_store(Settings::default(), SelectionStore::in_memory())
    }

    pub fn with_store(settings: Settings, store: SelectionStore) -> Self {
        let view = settings.view.clone();
        Self {
            phase: AppPhase::Running,
            ui_mode: UiMode::Normal,
            mode_before_block: UiMode::Normal,
            store,
            run_id: None,
            pairing: view.pairing,
            page: 1,
            page_size: view.page_size.max(1),
            include_pairs: view.include_pairs,
            group_rows: view.group_rows,
            filters: LogFilters::default(),
            page_data: None,
            logs_status: LogsStatus::Idle,
            cursor: 0,
            detail: None,
            timeline_pairing: view.pairing,
            timeline: TimelineView::Idle,
            timeline_cursor: 0,
            dialog: None,
            filter_form: None,
            run_input: String::new(),
            blocking: None,
            status_message: None,
            exports_in_flight: 0,
            spinner_frame: 0,
            settings,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.phase == AppPhase::Quitting
    }

    // ─────────────────────────────────────────────────────────
    // Contexts
    // ─────────────────────────────────────────────────────────

    /// Context the current state would issue a page request under
    pub fn request_context(&self) -> Option<RequestContext> {
        Some(RequestContext {
            run_id: self.run_id?,
            pairing: self.pairing,
            page: self.page,
            page_size: self.page_size,
            include_pairs: self.include_pairs,
            filters: self.filters.clone(),
            group_rows: self.group_rows,
        })
    }

    pub fn timeline_context(&self) -> Option<TimelineContext> {
        Some(TimelineContext {
            run_id: self.run_id?,
            pairing: self.timeline_pairing,
        })
    }

    pub fn scope(&self) -> Option<SelectionScope> {
        Some(SelectionScope::new(self.run_id?, self.pairing))
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        self.scope()
            .map(|scope| self.store.snapshot(scope))
            .unwrap_or_default()
    }

    // ─────────────────────────────────────────────────────────
    // Derived view
    // ─────────────────────────────────────────────────────────

    /// View tree for the current state, recomputed on every call
    pub fn view(&self) -> ViewTree {
        match self.request_context() {
            Some(context) => view::render(self.page_data.as_ref(), &context, &self.snapshot()),
            None => ViewTree::not_loaded(),
        }
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.view().lines().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn detail_entry(&self) -> Option<&LogEntry> {
        let id = self.detail?;
        self.page_data.as_ref()?.items.iter().find(|e| e.id == id)
    }

    pub fn geometry(&self) -> TimelineGeometry {
        TimelineGeometry::from(&self.settings.timeline)
    }

    // ─────────────────────────────────────────────────────────
    // Status
    // ─────────────────────────────────────────────────────────

    /// Any backend call in flight
    pub fn is_busy(&self) -> bool {
        self.logs_status == LogsStatus::Loading
            || self.timeline == TimelineView::Loading
            || self.dialog.as_ref().is_some_and(GroupDialog::is_loading)
            || self.exports_in_flight > 0
    }

    pub fn spinner(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn tick_spinner(&mut self) {
        if self.is_busy() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        } else {
            self.spinner_frame = 0;
        }
    }

    /// Show a blocking message; the next key closes it
    pub fn block(&mut self, message: impl Into<String>) {
        if self.ui_mode != UiMode::Blocking {
            self.mode_before_block = self.ui_mode;
        }
        self.blocking = Some(message.into());
        self.ui_mode = UiMode::Blocking;
    }

    /// Mode shown underneath the blocking message
    pub fn mode_before_block(&self) -> UiMode {
        self.mode_before_block
    }

    pub fn dismiss_block(&mut self) {
        self.blocking = None;
        self.ui_mode = self.mode_before_block;
        self.mode_before_block = UiMode::Normal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_takes_view_defaults() {
        let mut settings = Settings::default();
        settings.view.pairing = PairingMode::Phase;
        settings.view.page_size = 25;
        let state = AppState::with_store(settings, SelectionStore::in_memory());
        assert_eq!(state.pairing, PairingMode::Phase);
        assert_eq!(state.timeline_pairing, PairingMode::Phase);
        assert_eq!(state.page_size, 25);
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_no_run_means_no_context() {
        let state = AppState::new();
        assert!(state.request_context().is_none());
        assert!(state.timeline_context().is_none());
        assert_eq!(state.view(), ViewTree::not_loaded());
    }

    #[test]
    fn test_context_tracks_state() {
        let mut state = AppState::new();
        state.run_id = Some(4);
        state.page = 2;
        let ctx = state.request_context().unwrap();
        assert_eq!(ctx.run_id, 4);
        assert_eq!(ctx.page, 2);
        assert_eq!(ctx.pairing, PairingMode::Correlation);
    }

    #[test]
    fn test_spinner_only_moves_while_busy() {
        let mut state = AppState::new();
        state.tick_spinner();
        assert_eq!(state.spinner_frame, 0);

        state.logs_status = LogsStatus::Loading;
        state.tick_spinner();
        state.tick_spinner();
        assert_eq!(state.spinner_frame, 2);

        state.logs_status = LogsStatus::Loaded;
        state.tick_spinner();
        assert_eq!(state.spinner_frame, 0);
    }

    #[test]
    fn test_block_returns_to_previous_mode() {
        let mut state = AppState::new();
        state.ui_mode = UiMode::Dialog;
        state.block("nope");
        assert_eq!(state.ui_mode, UiMode::Blocking);
        state.dismiss_block();
        assert_eq!(state.ui_mode, UiMode::Dialog);
        assert!(state.blocking.is_none());
    }
}
