//! Full-screen rendering tests

use super::view;
use crate::test_utils::{load_timeline, state_with_page, TestTerminal};
use tflens_app::message::Message;
use tflens_app::{handler, AppState, DialogKind, UiMode, UpdateAction};
use tflens_backend::test_utils::{test_bar, test_entry, test_group};

fn render_screen(state: &AppState) -> TestTerminal {
    let mut term = TestTerminal::new();
    term.draw_with(|frame| view(frame, state));
    term
}

#[test]
fn test_startup_screen() {
    let state = AppState::new();
    let term = render_screen(&state);
    assert!(term.buffer_contains("no run (press r)"));
    assert!(term.buffer_contains("Select a run to see its timeline"));
    assert!(term.buffer_contains("No run selected"));
}

#[test]
fn test_loaded_run_shows_chart_and_groups() {
    let mut state = state_with_page(vec![
        test_entry(1, Some("req-a")),
        test_entry(2, Some("req-b")),
    ]);
    load_timeline(
        &mut state,
        vec![test_bar("req-a", 0, 4_000, 1), test_bar("req-b", 2_000, 6_000, 1)],
    );

    let term = render_screen(&state);
    assert!(term.buffer_contains("2 bars, duration 6s"));
    assert!(term.buffer_contains("req-a (1)"));
    assert!(term.buffer_contains("req-b (1)"));
}

#[test]
fn test_dialog_overlay() {
    let mut state = state_with_page(vec![test_entry(1, Some("r1"))]);
    let result = handler::update(&mut state, Message::OpenDialog(DialogKind::Display));
    let Some(UpdateAction::FetchGroups(context)) = result.action else {
        panic!("expected group fetch");
    };
    handler::update(
        &mut state,
        Message::GroupsLoaded {
            context,
            groups: vec![test_group("r1", 1)],
        },
    );

    let term = render_screen(&state);
    assert!(term.buffer_contains("Display groups"));
    assert!(term.buffer_contains("[ ] r1 (1)"));
}

#[test]
fn test_blocking_message_over_dialog() {
    let mut state = state_with_page(vec![test_entry(1, Some("r1"))]);
    handler::update(&mut state, Message::OpenDialog(DialogKind::Export));
    handler::update(&mut state, Message::DialogConfirm);
    assert_eq!(state.ui_mode, UiMode::Blocking);

    let term = render_screen(&state);
    assert!(term.buffer_contains("Export groups"));
    assert!(term.buffer_contains("press any key"));
}

#[test]
fn test_detail_overlay() {
    let mut state = state_with_page(vec![test_entry(4, Some("r1"))]);
    handler::update(&mut state, Message::MarkRead { entry_id: 4 });
    let term = render_screen(&state);
    assert!(term.buffer_contains("Entry 4"));
}

#[test]
fn test_small_terminal_does_not_panic() {
    let mut state = state_with_page(vec![test_entry(1, Some("r1"))]);
    load_timeline(&mut state, vec![test_bar("r1", 0, 1_000, 1)]);
    let mut term = TestTerminal::with_size(20, 8);
    term.draw_with(|frame| view(frame, &state));
}
