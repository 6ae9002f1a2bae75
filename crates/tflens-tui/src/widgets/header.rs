//! Top bar: run, pairing mode and request toggles

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use tflens_app::AppState;

use crate::theme::styles;

pub struct RunHeader<'a> {
    state: &'a AppState,
}

impl<'a> RunHeader<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn flag(label: &'static str, on: bool) -> Span<'static> {
        if on {
            Span::styled(label, styles::accent())
        } else {
            Span::styled(label, styles::text_muted())
        }
    }

    fn segments(&self) -> Vec<Span<'static>> {
        let state = self.state;
        let separator = Span::styled(" │ ", styles::text_muted());
        let mut spans = vec![Span::styled(" tflens", styles::accent_bold())];

        spans.push(separator.clone());
        match state.run_id {
            Some(run_id) => spans.push(Span::styled(format!("run {run_id}"), styles::text_primary())),
            None => spans.push(Span::styled("no run (press r)", styles::status_yellow())),
        }

        spans.push(separator.clone());
        spans.push(Span::styled("pair by ", styles::text_secondary()));
        spans.push(Span::styled(state.pairing.label(), styles::text_primary()));

        spans.push(separator.clone());
        spans.push(Self::flag("grouped", state.group_rows));
        spans.push(Span::raw(" "));
        spans.push(Self::flag("+pairs", state.include_pairs));
        if let Some(run_id) = state.run_id {
            spans.push(Span::raw(" "));
            spans.push(Self::flag("pinned-only", state.store.only_pinned(run_id)));
        }

        if !state.filters.is_empty() {
            spans.push(separator);
            spans.push(Span::styled(
                format!("filters: {}", state.filters.summary()),
                styles::status_blue(),
            ));
        }
        spans
    }
}

impl Widget for RunHeader<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false);
        let inner = block.inner(area);
        block.render(area, buf);
        Paragraph::new(Line::from(self.segments())).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{state_with_page, TestTerminal};

    #[test]
    fn test_header_without_run_prompts_for_one() {
        let state = AppState::new();
        let mut term = TestTerminal::new();
        let area = Rect::new(0, 0, 100, 3);
        term.render_widget(RunHeader::new(&state), area);
        assert!(term.buffer_contains("no run (press r)"));
        assert!(term.buffer_contains("pair by correlation id"));
    }

    #[test]
    fn test_header_shows_run_and_filters() {
        let mut state = state_with_page(vec![]);
        state.filters.phase = Some("apply".into());
        let mut term = TestTerminal::new();
        term.render_widget(RunHeader::new(&state), Rect::new(0, 0, 100, 3));
        assert!(term.buffer_contains("run 1"));
        assert!(term.buffer_contains("filters:"));
    }
}
