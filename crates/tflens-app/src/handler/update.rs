//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::{AppPhase, AppState};

use super::{dialogs, export, keys::handle_key, logs, timeline, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::Key(key) => match handle_key(state, key) {
            Some(msg) => UpdateResult::message(msg),
            None => UpdateResult::none(),
        },

        Message::Tick => {
            state.tick_spinner();
            UpdateResult::none()
        }

        Message::Quit => {
            state.phase = AppPhase::Quitting;
            UpdateResult::none()
        }

        Message::DismissMessage => {
            state.dismiss_block();
            UpdateResult::none()
        }

        // ─────────────────────────────────────────────────────────
        // Run & paging
        // ─────────────────────────────────────────────────────────
        Message::SelectRun(run_id) => logs::handle_select_run(state, run_id),
        Message::OpenRunInput => logs::handle_open_run_input(state),
        Message::RunInputChanged { text } => {
            state.run_input = text;
            UpdateResult::none()
        }
        Message::RunInputSubmit => logs::handle_run_input_submit(state),
        Message::RunInputCancel => logs::handle_run_input_cancel(state),
        Message::NextPage => logs::handle_next_page(state),
        Message::PrevPage => logs::handle_prev_page(state),
        Message::ResizePage(delta) => logs::handle_resize_page(state, delta),
        Message::Refresh => logs::handle_refresh(state),

        // ─────────────────────────────────────────────────────────
        // Log view
        // ─────────────────────────────────────────────────────────
        Message::CursorUp => logs::handle_cursor_move(state, -1),
        Message::CursorDown => logs::handle_cursor_move(state, 1),
        Message::CursorTop => logs::handle_cursor_to(state, 0),
        Message::CursorBottom => logs::handle_cursor_to(state, usize::MAX),
        Message::ActivateLine => logs::handle_activate_line(state),
        Message::TogglePinAtCursor => logs::handle_toggle_pin_at_cursor(state),
        Message::TogglePin { key } => logs::handle_toggle_pin(state, &key),
        Message::ToggleCollapse { key } => logs::handle_toggle_collapse(state, &key),
        Message::CollapseAll => logs::handle_collapse_all(state),
        Message::ExpandAll => logs::handle_expand_all(state),
        Message::MarkRead { entry_id } => logs::handle_mark_read(state, entry_id),
        Message::CloseDetail => logs::handle_close_detail(state),
        Message::CyclePairing => logs::handle_cycle_pairing(state),
        Message::ToggleGroupRows => logs::handle_toggle_group_rows(state),
        Message::ToggleIncludePairs => logs::handle_toggle_include_pairs(state),
        Message::ToggleOnlyPinned => logs::handle_toggle_only_pinned(state),

        // ─────────────────────────────────────────────────────────
        // Filters
        // ─────────────────────────────────────────────────────────
        Message::OpenFilterForm => logs::handle_open_filter_form(state),
        Message::FilterFormChar(c) => logs::edit_filter_form(state, |form| form.push(c)),
        Message::FilterFormBackspace => logs::edit_filter_form(state, |form| form.backspace()),
        Message::FilterFormClearField => {
            logs::edit_filter_form(state, |form| form.clear_field())
        }
        Message::FilterFormNextField => logs::edit_filter_form(state, |form| form.next_field()),
        Message::FilterFormPrevField => logs::edit_filter_form(state, |form| form.prev_field()),
        Message::FilterFormApply => logs::handle_filter_form_apply(state),
        Message::FilterFormCancel => logs::handle_filter_form_cancel(state),
        Message::CycleStatusFilter => logs::handle_cycle_status_filter(state),
        Message::ClearFilters => logs::handle_clear_filters(state),

        // ─────────────────────────────────────────────────────────
        // Selection dialogs
        // ─────────────────────────────────────────────────────────
        Message::OpenDialog(kind) => dialogs::handle_open(state, kind),
        Message::DialogUp => dialogs::edit(state, |d| d.move_up()),
        Message::DialogDown => dialogs::edit(state, |d| d.move_down()),
        Message::DialogToggle => dialogs::edit(state, |d| {
            d.toggle_current();
        }),
        Message::DialogSelectAll => dialogs::edit(state, |d| d.select_all()),
        Message::DialogDeselectAll => dialogs::edit(state, |d| d.deselect_all()),
        Message::DialogCyclePairing => dialogs::handle_cycle_pairing(state),
        Message::DialogReload => dialogs::handle_reload(state),
        Message::DialogConfirm => dialogs::handle_confirm(state),
        Message::DialogCancel => dialogs::handle_cancel(state),
        Message::ClearDisplayFilter => dialogs::handle_clear_display_filter(state),

        // ─────────────────────────────────────────────────────────
        // Timeline
        // ─────────────────────────────────────────────────────────
        Message::FocusTimeline => timeline::handle_focus(state),
        Message::BlurTimeline => timeline::handle_blur(state),
        Message::TimelineUp => timeline::handle_cursor_move(state, -1),
        Message::TimelineDown => timeline::handle_cursor_move(state, 1),
        Message::TimelineActivate => timeline::handle_activate(state),
        Message::TimelineClick { key } => timeline::handle_click(state, &key),
        Message::CycleTimelinePairing => timeline::handle_cycle_pairing(state),
        Message::ReloadTimeline => timeline::fetch(state),

        // ─────────────────────────────────────────────────────────
        // Exports
        // ─────────────────────────────────────────────────────────
        Message::ExportRun => export::handle_export_run(state),
        Message::ExportTimeline(format) => export::handle_export_timeline(state, format),

        // ─────────────────────────────────────────────────────────
        // Backend completions
        // ─────────────────────────────────────────────────────────
        Message::LogsLoaded { context, page } => logs::handle_logs_loaded(state, context, page),
        Message::LogsFailed { context, error } => logs::handle_logs_failed(state, context, error),
        Message::TimelineLoaded { context, bars } => {
            timeline::handle_loaded(state, context, bars)
        }
        Message::TimelineFailed { context, error } => {
            timeline::handle_failed(state, context, error)
        }
        Message::GroupsLoaded { context, groups } => {
            dialogs::handle_groups_loaded(state, context, groups)
        }
        Message::GroupsFailed { context, error } => {
            dialogs::handle_groups_failed(state, context, error)
        }
        Message::ExportFinished {
            request,
            path,
            bytes,
        } => export::handle_finished(state, request, path, bytes),
        Message::ExportFailed { request, error } => export::handle_failed(state, request, error),
    }
}
