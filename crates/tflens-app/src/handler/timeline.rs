//! Timeline focus, pairing and click handlers

use tflens_core::prelude::*;
use tflens_core::TimelineBar;

use crate::context::TimelineContext;
use crate::message::Message;
use crate::state::{AppState, UiMode};
use crate::timeline::{FilterPatch, TimelineLayout, TimelineView};

use super::{logs, UpdateAction, UpdateResult};

/// Issue a timeline fetch for the current run and chart pairing
pub(crate) fn fetch(state: &mut AppState) -> UpdateResult {
    match state.timeline_context() {
        Some(context) => {
            state.timeline = TimelineView::Loading;
            UpdateResult::action(UpdateAction::FetchTimeline(context))
        }
        None => {
            state.timeline = TimelineView::Idle;
            UpdateResult::none()
        }
    }
}

pub fn handle_focus(state: &mut AppState) -> UpdateResult {
    if state.run_id.is_some() {
        state.ui_mode = UiMode::Timeline;
    }
    UpdateResult::none()
}

pub fn handle_blur(state: &mut AppState) -> UpdateResult {
    state.ui_mode = UiMode::Normal;
    UpdateResult::none()
}

pub fn handle_cursor_move(state: &mut AppState, delta: isize) -> UpdateResult {
    let lanes = state.timeline.layout().map_or(0, |l| l.bars.len());
    if lanes == 0 {
        state.timeline_cursor = 0;
    } else {
        state.timeline_cursor = state
            .timeline_cursor
            .saturating_add_signed(delta)
            .min(lanes - 1);
    }
    UpdateResult::none()
}

pub fn handle_activate(state: &mut AppState) -> UpdateResult {
    match state
        .timeline
        .layout()
        .and_then(|l| l.bar(state.timeline_cursor))
    {
        Some(bar) => UpdateResult::message(Message::TimelineClick {
            key: bar.key.clone(),
        }),
        None => UpdateResult::none(),
    }
}

/// Write the bar key into the matching filter, then restart from page 1
pub fn handle_click(state: &mut AppState, key: &str) -> UpdateResult {
    let patch = FilterPatch::for_click(state.timeline_pairing, key);
    if patch == FilterPatch::Nothing {
        debug!("Timeline key {:?} carries no filter value", key);
        return UpdateResult::none();
    }
    let mut filters = state.filters.clone();
    patch.apply(&mut filters);
    debug!("Timeline click {:?} -> {}", key, filters.summary());
    state.filters = filters;
    state.ui_mode = UiMode::Normal;
    logs::restart(state)
}

pub fn handle_cycle_pairing(state: &mut AppState) -> UpdateResult {
    state.timeline_pairing = state.timeline_pairing.next();
    state.timeline_cursor = 0;
    fetch(state)
}

fn is_current(state: &AppState, context: &TimelineContext) -> bool {
    state.timeline_context().as_ref() == Some(context)
}

pub fn handle_loaded(
    state: &mut AppState,
    context: TimelineContext,
    bars: Vec<TimelineBar>,
) -> UpdateResult {
    if !is_current(state, &context) {
        debug!("Discarding stale timeline for {:?}", context);
        return UpdateResult::none();
    }
    state.timeline = match TimelineLayout::compute(&bars, &state.geometry()) {
        Some(layout) => {
            debug!("Timeline: {}", layout.header);
            TimelineView::Ready(layout)
        }
        None => TimelineView::Empty,
    };
    let lanes = state.timeline.layout().map_or(0, |l| l.bars.len());
    state.timeline_cursor = state.timeline_cursor.min(lanes.saturating_sub(1));
    UpdateResult::none()
}

pub fn handle_failed(state: &mut AppState, context: TimelineContext, error: String) -> UpdateResult {
    if !is_current(state, &context) {
        debug!("Discarding stale timeline failure: {}", error);
        return UpdateResult::none();
    }
    warn!("Timeline fetch failed: {}", error);
    state.timeline = TimelineView::Failed(error);
    state.timeline_cursor = 0;
    UpdateResult::none()
}
