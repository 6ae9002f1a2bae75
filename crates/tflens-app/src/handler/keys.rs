//! Key event handlers for different UI modes

use crate::dialog::DialogKind;
use crate::input_key::InputKey;
use crate::message::{Message, TimelineFormat};
use crate::state::{AppState, UiMode};

/// Entries added or removed by one page-size step
const PAGE_SIZE_STEP: i32 = 10;

/// Convert key events to messages based on current UI mode
pub fn handle_key(state: &AppState, key: InputKey) -> Option<Message> {
    // Force quit works everywhere
    if key == InputKey::CharCtrl('c') {
        return Some(Message::Quit);
    }
    match state.ui_mode {
        UiMode::Normal => handle_key_normal(key),
        UiMode::Timeline => handle_key_timeline(key),
        UiMode::FilterForm => handle_key_filter_form(key),
        UiMode::RunInput => handle_key_run_input(state, key),
        UiMode::Dialog => handle_key_dialog(key),
        UiMode::Detail => handle_key_detail(key),
        UiMode::Blocking => Some(Message::DismissMessage),
    }
}

/// Handle key events in the log view
fn handle_key_normal(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') => Some(Message::Quit),

        // ─────────────────────────────────────────────────────────
        // Cursor & paging
        // ─────────────────────────────────────────────────────────
        InputKey::Char('j') | InputKey::Down => Some(Message::CursorDown),
        InputKey::Char('k') | InputKey::Up => Some(Message::CursorUp),
        InputKey::Home => Some(Message::CursorTop),
        InputKey::End => Some(Message::CursorBottom),
        InputKey::Right | InputKey::PageDown => Some(Message::NextPage),
        InputKey::Left | InputKey::PageUp => Some(Message::PrevPage),
        InputKey::Char('+') => Some(Message::ResizePage(PAGE_SIZE_STEP)),
        InputKey::Char('-') => Some(Message::ResizePage(-PAGE_SIZE_STEP)),
        InputKey::Char('R') | InputKey::F(5) => Some(Message::Refresh),
        InputKey::Char('r') => Some(Message::OpenRunInput),

        // ─────────────────────────────────────────────────────────
        // Groups
        // ─────────────────────────────────────────────────────────
        InputKey::Enter | InputKey::Char(' ') => Some(Message::ActivateLine),
        InputKey::Char('p') => Some(Message::TogglePinAtCursor),
        InputKey::Char('c') => Some(Message::CollapseAll),
        InputKey::Char('e') => Some(Message::ExpandAll),
        InputKey::Char('m') => Some(Message::CyclePairing),
        InputKey::Char('g') => Some(Message::ToggleGroupRows),
        InputKey::Char('i') => Some(Message::ToggleIncludePairs),
        InputKey::Char('o') => Some(Message::ToggleOnlyPinned),

        // ─────────────────────────────────────────────────────────
        // Filters
        // ─────────────────────────────────────────────────────────
        InputKey::Char('/') => Some(Message::OpenFilterForm),
        InputKey::Char('s') => Some(Message::CycleStatusFilter),
        InputKey::Char('x') => Some(Message::ClearFilters),

        // ─────────────────────────────────────────────────────────
        // Dialogs & exports
        // ─────────────────────────────────────────────────────────
        InputKey::Char('E') => Some(Message::OpenDialog(DialogKind::Export)),
        InputKey::Char('D') => Some(Message::OpenDialog(DialogKind::Display)),
        InputKey::Char('C') => Some(Message::ClearDisplayFilter),
        InputKey::Char('w') => Some(Message::ExportRun),
        InputKey::Char('t') => Some(Message::ExportTimeline(TimelineFormat::Json)),
        InputKey::Char('T') => Some(Message::ExportTimeline(TimelineFormat::Csv)),

        InputKey::Tab => Some(Message::FocusTimeline),
        _ => None,
    }
}

/// Handle key events while the timeline has focus
fn handle_key_timeline(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Char('q') => Some(Message::Quit),
        InputKey::Esc | InputKey::Tab | InputKey::BackTab => Some(Message::BlurTimeline),
        InputKey::Char('j') | InputKey::Down => Some(Message::TimelineDown),
        InputKey::Char('k') | InputKey::Up => Some(Message::TimelineUp),
        InputKey::Enter | InputKey::Char(' ') => Some(Message::TimelineActivate),
        InputKey::Char('m') => Some(Message::CycleTimelinePairing),
        InputKey::Char('R') | InputKey::F(5) => Some(Message::ReloadTimeline),
        InputKey::Char('t') => Some(Message::ExportTimeline(TimelineFormat::Json)),
        InputKey::Char('T') => Some(Message::ExportTimeline(TimelineFormat::Csv)),
        _ => None,
    }
}

/// Handle key events in the filter form
fn handle_key_filter_form(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc => Some(Message::FilterFormCancel),
        InputKey::Enter => Some(Message::FilterFormApply),
        InputKey::Tab | InputKey::Down => Some(Message::FilterFormNextField),
        InputKey::BackTab | InputKey::Up => Some(Message::FilterFormPrevField),
        InputKey::Backspace => Some(Message::FilterFormBackspace),
        InputKey::CharCtrl('u') => Some(Message::FilterFormClearField),
        InputKey::Char(c) => Some(Message::FilterFormChar(c)),
        _ => None,
    }
}

/// Handle key events while typing a run id
fn handle_key_run_input(state: &AppState, key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc => Some(Message::RunInputCancel),
        InputKey::Enter => Some(Message::RunInputSubmit),
        InputKey::Backspace => {
            let mut text = state.run_input.clone();
            text.pop();
            Some(Message::RunInputChanged { text })
        }
        InputKey::CharCtrl('u') => Some(Message::RunInputChanged {
            text: String::new(),
        }),
        InputKey::Char(c) if c.is_ascii_digit() => {
            let mut text = state.run_input.clone();
            text.push(c);
            Some(Message::RunInputChanged { text })
        }
        _ => None,
    }
}

/// Handle key events in a selection dialog
fn handle_key_dialog(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc | InputKey::Char('q') => Some(Message::DialogCancel),
        InputKey::Enter => Some(Message::DialogConfirm),
        InputKey::Char('j') | InputKey::Down => Some(Message::DialogDown),
        InputKey::Char('k') | InputKey::Up => Some(Message::DialogUp),
        InputKey::Char(' ') => Some(Message::DialogToggle),
        InputKey::Char('a') => Some(Message::DialogSelectAll),
        InputKey::Char('d') => Some(Message::DialogDeselectAll),
        InputKey::Char('m') => Some(Message::DialogCyclePairing),
        InputKey::Char('r') => Some(Message::DialogReload),
        _ => None,
    }
}

/// Handle key events in the entry detail popup
fn handle_key_detail(key: InputKey) -> Option<Message> {
    match key {
        InputKey::Esc | InputKey::Enter | InputKey::Char('q') | InputKey::Char(' ') => {
            Some(Message::CloseDetail)
        }
        _ => None,
    }
}
