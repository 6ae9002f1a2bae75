//! Blocking message; any key closes it

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use crate::theme::styles;

use super::modal_overlay;

pub struct MessageBox<'a> {
    message: &'a str,
}

impl<'a> MessageBox<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Widget for MessageBox<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chars = u16::try_from(self.message.chars().count()).unwrap_or(u16::MAX);
        let width = chars.saturating_add(6).clamp(30, 70);
        let modal = modal_overlay::centered_rect(width, 6, area);
        modal_overlay::prepare_modal(buf, area, modal);

        let block = styles::modal_block("Notice");
        let inner = block.inner(modal);
        block.render(modal, buf);

        let lines = vec![
            Line::from(Span::styled(self.message.to_string(), styles::status_yellow())),
            Line::default(),
            Line::from(Span::styled("press any key", styles::text_muted())),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
