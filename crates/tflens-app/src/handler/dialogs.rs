//! Export / display selection dialog handlers

use tflens_backend::ExportRequest;
use tflens_core::prelude::*;
use tflens_core::GroupSummary;

use crate::context::GroupListContext;
use crate::dialog::{DialogKind, GroupDialog};
use crate::state::{AppState, UiMode};
use crate::store::{KeySetPurpose, SelectionScope};

use super::{export, logs, UpdateAction, UpdateResult};

pub fn handle_open(state: &mut AppState, kind: DialogKind) -> UpdateResult {
    let Some(run_id) = state.run_id else {
        debug!("Rejected {:?} dialog: no active run", kind);
        state.block(Error::NoActiveRun.to_string());
        return UpdateResult::none();
    };
    let seed = state
        .store
        .key_set(kind.purpose(), SelectionScope::new(run_id, state.pairing));
    let dialog = GroupDialog::new(kind, run_id, state.pairing, seed);
    let context = dialog.context();
    state.dialog = Some(dialog);
    state.ui_mode = UiMode::Dialog;
    UpdateResult::action(UpdateAction::FetchGroups(context))
}

pub fn edit(state: &mut AppState, edit: impl FnOnce(&mut GroupDialog)) -> UpdateResult {
    if let Some(dialog) = state.dialog.as_mut() {
        edit(dialog);
    }
    UpdateResult::none()
}

pub fn handle_cycle_pairing(state: &mut AppState) -> UpdateResult {
    let Some(dialog) = state.dialog.as_mut() else {
        return UpdateResult::none();
    };
    let pairing = dialog.pairing.next();
    let seed = state.store.key_set(
        dialog.kind.purpose(),
        SelectionScope::new(dialog.run_id, pairing),
    );
    dialog.switch_pairing(pairing, seed);
    UpdateResult::action(UpdateAction::FetchGroups(dialog.context()))
}

pub fn handle_reload(state: &mut AppState) -> UpdateResult {
    let Some(dialog) = state.dialog.as_mut() else {
        return UpdateResult::none();
    };
    dialog.reload();
    UpdateResult::action(UpdateAction::FetchGroups(dialog.context()))
}

pub fn handle_confirm(state: &mut AppState) -> UpdateResult {
    let Some(dialog) = state.dialog.as_ref() else {
        return UpdateResult::none();
    };
    let kind = dialog.kind;
    let run_id = dialog.run_id;
    let pairing = dialog.pairing;
    let chosen = dialog.chosen();
    let scope = SelectionScope::new(run_id, pairing);

    match kind {
        DialogKind::Export => {
            state
                .store
                .replace_key_set(KeySetPurpose::ExportPin, scope, &chosen);
            if chosen.is_empty() {
                debug!("Rejected export: nothing selected");
                state.block(Error::nothing_selected("export").to_string());
                return UpdateResult::none();
            }
            state.dialog = None;
            state.ui_mode = UiMode::Normal;
            export::download(
                state,
                ExportRequest::ByKeys {
                    run_id,
                    pairing,
                    keys: chosen.to_vec(),
                },
            )
        }
        DialogKind::Display => {
            if chosen.is_empty() {
                debug!("Rejected display filter: nothing selected");
                state.block(Error::nothing_selected("display").to_string());
                return UpdateResult::none();
            }
            state
                .store
                .replace_key_set(KeySetPurpose::DisplayFilter, scope, &chosen);
            info!(
                "Display filter of {} groups applied ({})",
                chosen.len(),
                pairing
            );
            state.dialog = None;
            state.ui_mode = UiMode::Normal;
            state.pairing = pairing;
            state.group_rows = true;
            logs::restart(state)
        }
    }
}

pub fn handle_cancel(state: &mut AppState) -> UpdateResult {
    state.dialog = None;
    state.ui_mode = UiMode::Normal;
    UpdateResult::none()
}

pub fn handle_clear_display_filter(state: &mut AppState) -> UpdateResult {
    let Some(scope) = state.scope() else {
        return UpdateResult::none();
    };
    state
        .store
        .clear_key_set(KeySetPurpose::DisplayFilter, scope);
    state.status_message = Some("Display filter cleared".to_string());
    state.clamp_cursor();
    UpdateResult::none()
}

fn is_current(state: &AppState, context: &GroupListContext) -> bool {
    state
        .dialog
        .as_ref()
        .is_some_and(|d| d.context() == *context)
}

pub fn handle_groups_loaded(
    state: &mut AppState,
    context: GroupListContext,
    groups: Vec<GroupSummary>,
) -> UpdateResult {
    if !is_current(state, &context) {
        debug!("Discarding stale group listing for {:?}", context);
        return UpdateResult::none();
    }
    if let Some(dialog) = state.dialog.as_mut() {
        dialog.set_groups(groups);
    }
    UpdateResult::none()
}

pub fn handle_groups_failed(
    state: &mut AppState,
    context: GroupListContext,
    error: String,
) -> UpdateResult {
    if !is_current(state, &context) {
        debug!("Discarding stale group listing failure: {}", error);
        return UpdateResult::none();
    }
    warn!("Group listing failed: {}", error);
    if let Some(dialog) = state.dialog.as_mut() {
        dialog.fail(error);
    }
    UpdateResult::none()
}
