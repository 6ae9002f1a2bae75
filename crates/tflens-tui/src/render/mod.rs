//! Main render/view function (View in TEA pattern)

#[cfg(test)]
mod tests;

use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;

use tflens_app::{AppState, UiMode};

use crate::theme::palette;
use crate::{layout, widgets};

/// Render the complete UI. Reads state only; the view tree is recomputed
/// from the page and selection on every frame.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    let lanes = state.timeline.layout().map_or(0, |l| l.bars.len());
    let areas = layout::create(area, lanes);
    let tree = state.view();

    frame.render_widget(widgets::RunHeader::new(state), areas.header);
    frame.render_widget(
        widgets::TimelineChart::new(&state.timeline, state.timeline_pairing)
            .cursor(state.timeline_cursor)
            .focused(state.ui_mode == UiMode::Timeline),
        areas.timeline,
    );
    frame.render_widget(
        widgets::LogTree::new(&tree, &state.logs_status)
            .cursor(state.cursor)
            .focused(state.ui_mode != UiMode::Timeline),
        areas.logs,
    );
    frame.render_widget(widgets::StatusBar::new(state, &tree), areas.status);

    render_overlay(frame, state, state.ui_mode);
}

fn render_overlay(frame: &mut Frame, state: &AppState, mode: UiMode) {
    let area = frame.area();
    match mode {
        UiMode::Normal | UiMode::Timeline => {}
        UiMode::FilterForm => {
            if let Some(form) = &state.filter_form {
                frame.render_widget(widgets::FilterFormPopup::new(form, state.filters.status), area);
            }
        }
        UiMode::RunInput => {
            frame.render_widget(widgets::RunInputPopup::new(&state.run_input), area);
        }
        UiMode::Dialog => {
            if let Some(dialog) = &state.dialog {
                frame.render_widget(widgets::GroupDialogPopup::new(dialog), area);
            }
        }
        UiMode::Detail => {
            if let Some(entry) = state.detail_entry() {
                frame.render_widget(widgets::DetailPopup::new(entry), area);
            }
        }
        UiMode::Blocking => {
            // keep whatever the message interrupted visible underneath
            if state.mode_before_block() != UiMode::Blocking {
                render_overlay(frame, state, state.mode_before_block());
            }
            if let Some(message) = &state.blocking {
                frame.render_widget(widgets::MessageBox::new(message), area);
            }
        }
    }
}
