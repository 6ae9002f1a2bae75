//! Run id prompt

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::theme::styles;

use super::modal_overlay;

pub struct RunInputPopup<'a> {
    text: &'a str,
}

impl<'a> RunInputPopup<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl Widget for RunInputPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = modal_overlay::centered_rect(40, 5, area);
        modal_overlay::prepare_modal(buf, area, modal);

        let block = styles::modal_block("Open run");
        let inner = block.inner(modal);
        block.render(modal, buf);

        let lines = vec![
            Line::from(vec![
                Span::styled("run id: ", styles::text_secondary()),
                Span::styled(self.text.to_string(), styles::text_primary()),
                Span::styled("▏", styles::accent()),
            ]),
            Line::from(Span::styled("enter open · esc cancel", styles::text_muted())),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}
