//! Bottom bar: spinner, page status, pins, last message and key hints

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use tflens_app::{AppState, UiMode, ViewTree};

use crate::theme::styles;

pub struct StatusBar<'a> {
    state: &'a AppState,
    tree: &'a ViewTree,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState, tree: &'a ViewTree) -> Self {
        Self { state, tree }
    }

    fn hints(&self) -> &'static str {
        match self.state.ui_mode {
            UiMode::Timeline => "j/k lane · enter filter · m mode · t/T export · tab back",
            _ => "p pin · E export · D display · / filter · m mode · w run export · r run · q quit",
        }
    }

    fn segments(&self) -> Vec<Span<'static>> {
        let separator = Span::styled(" │ ", styles::text_muted());
        let mut spans = vec![Span::raw(" ")];

        if self.state.is_busy() {
            spans.push(Span::styled(
                format!("{} working", self.state.spinner()),
                styles::status_yellow(),
            ));
        } else {
            spans.push(Span::styled("● idle", styles::status_green()));
        }

        if let Some(pinned) = &self.tree.pinned_indicator {
            spans.push(separator.clone());
            spans.push(Span::styled(pinned.clone(), styles::keybinding()));
        }

        if let Some(message) = &self.state.status_message {
            spans.push(separator.clone());
            spans.push(Span::styled(message.clone(), styles::text_primary()));
        }

        spans.push(separator);
        spans.push(Span::styled(self.hints(), styles::text_muted()));
        spans
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(styles::text_muted());
        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(Line::from(self.segments())).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{state_with_page, TestTerminal};
    use tflens_app::message::Message;
    use tflens_backend::test_utils::test_entry;

    #[test]
    fn test_status_bar_shows_pins_and_message() {
        let mut state = state_with_page(vec![test_entry(1, Some("r1"))]);
        tflens_app::handler::update(&mut state, Message::TogglePin { key: "r1".into() });
        state.status_message = Some("Saved run-1.jsonl".into());
        let tree = state.view();

        let mut term = TestTerminal::with_size(160, 2);
        let area = term.area();
        term.render_widget(StatusBar::new(&state, &tree), area);

        assert!(term.buffer_contains("● idle"));
        assert!(term.buffer_contains("(1 selected for export)"));
        assert!(term.buffer_contains("Saved run-1.jsonl"));
    }

    #[test]
    fn test_status_bar_spins_while_busy() {
        let mut state = state_with_page(vec![]);
        state.exports_in_flight = 1;
        let tree = state.view();
        let mut term = TestTerminal::with_size(120, 2);
        let area = term.area();
        term.render_widget(StatusBar::new(&state, &tree), area);
        assert!(term.buffer_contains("working"));
    }
}
