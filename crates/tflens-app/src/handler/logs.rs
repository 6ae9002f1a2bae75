//! Run selection, paging, grouping and filter handlers

use tflens_core::prelude::*;
use tflens_core::{extract_key, EntryId, LogFilters, LogsPage, RunId, StatusFilter};

use crate::context::RequestContext;
use crate::filter_form::FilterForm;
use crate::message::Message;
use crate::state::{AppState, LogsStatus, UiMode, PAGE_SIZE_RANGE};
use crate::store::KeySetPurpose;
use crate::view::ViewLine;

use super::{UpdateAction, UpdateResult};

/// Issue a page fetch under the current context
pub(crate) fn fetch(state: &mut AppState) -> UpdateResult {
    match state.request_context() {
        Some(context) => {
            state.logs_status = LogsStatus::Loading;
            UpdateResult::action(UpdateAction::FetchLogs(context))
        }
        None => UpdateResult::none(),
    }
}

/// Reset to page 1 and fetch; used by every change that alters the result set
pub(crate) fn restart(state: &mut AppState) -> UpdateResult {
    state.page = 1;
    state.cursor = 0;
    fetch(state)
}

fn reject_without_run(state: &mut AppState) -> Option<RunId> {
    if state.run_id.is_none() {
        debug!("Rejected: no active run");
        state.block(Error::NoActiveRun.to_string());
    }
    state.run_id
}

// ─────────────────────────────────────────────────────────
// Run & paging
// ─────────────────────────────────────────────────────────

pub fn handle_select_run(state: &mut AppState, run_id: RunId) -> UpdateResult {
    info!("Selecting run {}", run_id);
    state.run_id = Some(run_id);
    state.page_data = None;
    state.detail = None;
    state.dialog = None;
    state.status_message = None;
    state.timeline_cursor = 0;
    state.ui_mode = UiMode::Normal;

    match restart(state).action {
        Some(action) => UpdateResult::action_then(action, Message::ReloadTimeline),
        None => UpdateResult::none(),
    }
}

pub fn handle_open_run_input(state: &mut AppState) -> UpdateResult {
    state.run_input = state.run_id.map(|id| id.to_string()).unwrap_or_default();
    state.ui_mode = UiMode::RunInput;
    UpdateResult::none()
}

pub fn handle_run_input_submit(state: &mut AppState) -> UpdateResult {
    let text = state.run_input.trim().to_string();
    match text.parse::<RunId>() {
        Ok(run_id) if run_id > 0 => {
            state.run_input.clear();
            state.ui_mode = UiMode::Normal;
            UpdateResult::message(Message::SelectRun(run_id))
        }
        _ => {
            state.block(format!("Invalid run id: {:?}", text));
            UpdateResult::none()
        }
    }
}

pub fn handle_run_input_cancel(state: &mut AppState) -> UpdateResult {
    state.run_input.clear();
    state.ui_mode = UiMode::Normal;
    UpdateResult::none()
}

pub fn handle_next_page(state: &mut AppState) -> UpdateResult {
    if let Some(page) = &state.page_data {
        let shown = u64::from(state.page) * u64::from(state.page_size);
        if shown >= page.total {
            debug!("Already on the last page");
            return UpdateResult::none();
        }
    }
    if state.run_id.is_none() {
        return UpdateResult::none();
    }
    state.page += 1;
    state.cursor = 0;
    fetch(state)
}

pub fn handle_prev_page(state: &mut AppState) -> UpdateResult {
    if state.page <= 1 || state.run_id.is_none() {
        return UpdateResult::none();
    }
    state.page -= 1;
    state.cursor = 0;
    fetch(state)
}

pub fn handle_resize_page(state: &mut AppState, delta: i32) -> UpdateResult {
    let (min, max) = PAGE_SIZE_RANGE;
    let size = (i64::from(state.page_size) + i64::from(delta)).clamp(i64::from(min), i64::from(max));
    let size = size as u32;
    if size == state.page_size {
        return UpdateResult::none();
    }
    state.page_size = size;
    restart(state)
}

pub fn handle_refresh(state: &mut AppState) -> UpdateResult {
    if reject_without_run(state).is_none() {
        return UpdateResult::none();
    }
    match fetch(state).action {
        Some(action) => UpdateResult::action_then(action, Message::ReloadTimeline),
        None => UpdateResult::none(),
    }
}

// ─────────────────────────────────────────────────────────
// Completions
// ─────────────────────────────────────────────────────────

pub fn handle_logs_loaded(
    state: &mut AppState,
    context: RequestContext,
    page: LogsPage,
) -> UpdateResult {
    if state.request_context().as_ref() != Some(&context) {
        debug!(
            "Discarding stale log page (run {}, page {})",
            context.run_id, context.page
        );
        return UpdateResult::none();
    }
    debug!(
        "Loaded {} entries (+{} extra) of {}",
        page.items.len(),
        page.extras,
        page.total
    );
    state.page_data = Some(page);
    state.logs_status = LogsStatus::Loaded;
    if state.detail_entry().is_none() {
        state.detail = None;
        if state.ui_mode == UiMode::Detail {
            state.ui_mode = UiMode::Normal;
        }
    }
    state.clamp_cursor();
    UpdateResult::none()
}

pub fn handle_logs_failed(
    state: &mut AppState,
    context: RequestContext,
    error: String,
) -> UpdateResult {
    if state.request_context().as_ref() != Some(&context) {
        debug!("Discarding stale log failure: {}", error);
        return UpdateResult::none();
    }
    warn!("Log page fetch failed: {}", error);
    state.page_data = None;
    state.logs_status = LogsStatus::Failed(error);
    state.cursor = 0;
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────
// Cursor & groups
// ─────────────────────────────────────────────────────────

pub fn handle_cursor_move(state: &mut AppState, delta: isize) -> UpdateResult {
    let len = state.view().lines().len();
    if len == 0 {
        state.cursor = 0;
        return UpdateResult::none();
    }
    state.cursor = state.cursor.saturating_add_signed(delta).min(len - 1);
    UpdateResult::none()
}

pub fn handle_cursor_to(state: &mut AppState, index: usize) -> UpdateResult {
    state.cursor = index;
    state.clamp_cursor();
    UpdateResult::none()
}

/// Key of the group the cursor is in, for headers and grouped or flat rows
fn group_key_at_cursor(state: &AppState) -> Option<String> {
    let tree = state.view();
    let line = tree.lines().get(state.cursor).copied()?;
    match line {
        ViewLine::Header { group } | ViewLine::Row { group: Some(group), .. } => {
            tree.group(group).map(|g| g.key.clone())
        }
        ViewLine::Row { group: None, .. } => {
            let entry_id = tree.row(line)?.entry_id;
            let entry = state.page_data.as_ref()?.items.iter().find(|e| e.id == entry_id)?;
            Some(extract_key(state.pairing, entry))
        }
    }
}

/// Put the cursor back on the header of `key` after the order changed
fn follow_group(state: &mut AppState, key: &str) {
    let tree = state.view();
    let found = tree.lines().iter().position(|line| match line {
        ViewLine::Header { group } => tree.group(*group).is_some_and(|g| g.key == key),
        _ => false,
    });
    match found {
        Some(index) => state.cursor = index,
        None => state.clamp_cursor(),
    }
}

pub fn handle_activate_line(state: &mut AppState) -> UpdateResult {
    let tree = state.view();
    let Some(line) = tree.lines().get(state.cursor).copied() else {
        return UpdateResult::none();
    };
    match line {
        ViewLine::Header { group } => match tree.group(group) {
            Some(g) => UpdateResult::message(Message::ToggleCollapse { key: g.key.clone() }),
            None => UpdateResult::none(),
        },
        ViewLine::Row { .. } => match tree.row(line) {
            Some(row) => UpdateResult::message(Message::MarkRead {
                entry_id: row.entry_id,
            }),
            None => UpdateResult::none(),
        },
    }
}

pub fn handle_toggle_pin_at_cursor(state: &mut AppState) -> UpdateResult {
    match group_key_at_cursor(state) {
        Some(key) => UpdateResult::message(Message::TogglePin { key }),
        None => UpdateResult::none(),
    }
}

pub fn handle_toggle_pin(state: &mut AppState, key: &str) -> UpdateResult {
    let Some(scope) = state.scope() else {
        return UpdateResult::none();
    };
    let pinned = state.store.toggle_key(KeySetPurpose::ExportPin, scope, key);
    debug!("Export pin {} -> {}", key, pinned);
    follow_group(state, key);
    UpdateResult::none()
}

pub fn handle_toggle_collapse(state: &mut AppState, key: &str) -> UpdateResult {
    let Some(scope) = state.scope() else {
        return UpdateResult::none();
    };
    state.store.toggle_collapsed(scope, key);
    follow_group(state, key);
    UpdateResult::none()
}

pub fn handle_collapse_all(state: &mut AppState) -> UpdateResult {
    let Some(scope) = state.scope() else {
        return UpdateResult::none();
    };
    let keys = state.view().group_keys();
    state
        .store
        .collapse_all(scope, keys.iter().map(String::as_str));
    state.clamp_cursor();
    UpdateResult::none()
}

pub fn handle_expand_all(state: &mut AppState) -> UpdateResult {
    if let Some(scope) = state.scope() {
        state.store.expand_all(scope);
    }
    UpdateResult::none()
}

pub fn handle_mark_read(state: &mut AppState, entry_id: EntryId) -> UpdateResult {
    let Some(run_id) = state.run_id else {
        return UpdateResult::none();
    };
    state.store.mark_read(run_id, entry_id);
    state.detail = Some(entry_id);
    state.ui_mode = UiMode::Detail;
    UpdateResult::none()
}

pub fn handle_close_detail(state: &mut AppState) -> UpdateResult {
    state.detail = None;
    state.ui_mode = UiMode::Normal;
    UpdateResult::none()
}

pub fn handle_cycle_pairing(state: &mut AppState) -> UpdateResult {
    state.pairing = state.pairing.next();
    info!("Pairing mode: {}", state.pairing);
    restart(state)
}

pub fn handle_toggle_group_rows(state: &mut AppState) -> UpdateResult {
    state.group_rows = !state.group_rows;
    state.cursor = 0;
    fetch(state)
}

pub fn handle_toggle_include_pairs(state: &mut AppState) -> UpdateResult {
    state.include_pairs = !state.include_pairs;
    fetch(state)
}

pub fn handle_toggle_only_pinned(state: &mut AppState) -> UpdateResult {
    let Some(run_id) = state.run_id else {
        return UpdateResult::none();
    };
    let only_pinned = !state.store.only_pinned(run_id);
    state.store.set_only_pinned(run_id, only_pinned);
    state.clamp_cursor();
    UpdateResult::none()
}

// ─────────────────────────────────────────────────────────
// Filters
// ─────────────────────────────────────────────────────────

pub fn handle_open_filter_form(state: &mut AppState) -> UpdateResult {
    state.filter_form = Some(FilterForm::from_filters(&state.filters));
    state.ui_mode = UiMode::FilterForm;
    UpdateResult::none()
}

pub fn edit_filter_form(state: &mut AppState, edit: impl FnOnce(&mut FilterForm)) -> UpdateResult {
    if let Some(form) = state.filter_form.as_mut() {
        edit(form);
    }
    UpdateResult::none()
}

pub fn handle_filter_form_apply(state: &mut AppState) -> UpdateResult {
    let Some(form) = state.filter_form.as_ref() else {
        return UpdateResult::none();
    };
    match form.to_filters(&state.filters) {
        Ok(filters) => {
            state.filter_form = None;
            state.ui_mode = UiMode::Normal;
            set_filters(state, filters)
        }
        Err(message) => {
            state.block(message);
            UpdateResult::none()
        }
    }
}

pub fn handle_filter_form_cancel(state: &mut AppState) -> UpdateResult {
    state.filter_form = None;
    state.ui_mode = UiMode::Normal;
    UpdateResult::none()
}

pub fn handle_cycle_status_filter(state: &mut AppState) -> UpdateResult {
    let mut filters = state.filters.clone();
    filters.status = StatusFilter::cycle(filters.status);
    set_filters(state, filters)
}

pub fn handle_clear_filters(state: &mut AppState) -> UpdateResult {
    set_filters(state, LogFilters::default())
}

/// Replace the filters; a change resets to page 1 and re-fetches
pub(crate) fn set_filters(state: &mut AppState, filters: LogFilters) -> UpdateResult {
    if filters == state.filters {
        return UpdateResult::none();
    }
    debug!("Filters: {}", filters.summary());
    state.filters = filters;
    restart(state)
}
