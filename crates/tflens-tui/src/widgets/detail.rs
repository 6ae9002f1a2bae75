//! Entry detail popup with the pretty-printed payload

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget, Wrap};

use tflens_core::LogEntry;

use crate::theme::styles;

use super::modal_overlay;

pub struct DetailPopup<'a> {
    entry: &'a LogEntry,
}

impl<'a> DetailPopup<'a> {
    pub fn new(entry: &'a LogEntry) -> Self {
        Self { entry }
    }

    fn field(name: &'static str, value: Option<&str>) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{name:>10}: "), styles::text_secondary()),
            Span::styled(value.unwrap_or("-").to_string(), styles::text_primary()),
        ])
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let e = self.entry;
        let id = e.id.to_string();
        let time = e.formatted_time();
        let level = e.level_kind();
        let mut lines = vec![
            Self::field("id", Some(id.as_str())),
            Self::field("time", Some(time.as_str()).filter(|t| !t.is_empty())),
            Line::from(vec![
                Span::styled(format!("{:>10}: ", "level"), styles::text_secondary()),
                Span::styled(level.badge(), styles::level(level)),
                Span::styled(format!("  {:?}", e.status()), styles::entry_status(e.status())),
            ]),
            Self::field("phase", e.phase.as_deref()),
            Self::field("tf_req_id", e.correlation_id.as_deref()),
            Self::field("resource", e.resource_type.as_deref()),
            Self::field("name", e.resource_name.as_deref()),
            Line::default(),
        ];
        lines.extend(
            e.message
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), styles::text_primary()))),
        );
        if let Some(payload) = e.payload_pretty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled("payload", styles::accent_bold())));
            lines.extend(
                payload
                    .lines()
                    .map(|l| Line::from(Span::styled(l.to_string(), styles::text_secondary()))),
            );
        }
        lines
    }
}

impl Widget for DetailPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let modal = modal_overlay::centered_rect(
            area.width.saturating_sub(8),
            area.height.saturating_sub(4),
            area,
        );
        modal_overlay::prepare_modal(buf, area, modal);

        let title = format!("Entry {}", self.entry.id);
        let block = styles::modal_block(&title)
            .title_bottom(Line::from(Span::styled(" esc close ", styles::text_muted())));
        let inner = block.inner(modal);
        block.render(modal, buf);

        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
