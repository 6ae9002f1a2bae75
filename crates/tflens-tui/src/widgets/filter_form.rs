//! Filter editing popup

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use tflens_app::filter_form::{FilterField, FilterForm};
use tflens_core::StatusFilter;

use crate::theme::styles;

use super::modal_overlay;

const LABEL_WIDTH: usize = 15;

pub struct FilterFormPopup<'a> {
    form: &'a FilterForm,
    status: Option<StatusFilter>,
}

impl<'a> FilterFormPopup<'a> {
    pub fn new(form: &'a FilterForm, status: Option<StatusFilter>) -> Self {
        Self { form, status }
    }
}

impl Widget for FilterFormPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = FilterField::ALL.len() as u16 + 6;
        let modal = modal_overlay::centered_rect(70, height, area);
        modal_overlay::prepare_modal(buf, area, modal);

        let block = styles::modal_block("Filters");
        let inner = block.inner(modal);
        block.render(modal, buf);

        let mut lines: Vec<Line> = FilterField::ALL
            .iter()
            .map(|&field| {
                let active = field == self.form.field;
                let label = format!("{:>width$}: ", field.label(), width = LABEL_WIDTH);
                let value = self.form.value(field).to_string();
                let mut spans = vec![
                    Span::styled(label, if active { styles::accent_bold() } else { styles::text_secondary() }),
                    Span::styled(value, styles::text_primary()),
                ];
                if active {
                    spans.push(Span::styled("▏", styles::accent()));
                }
                Line::from(spans)
            })
            .collect();

        let status = self.status.map_or("any", |s| s.as_str());
        lines.push(Line::from(vec![
            Span::styled(format!("{:>width$}: ", "status", width = LABEL_WIDTH), styles::text_secondary()),
            Span::styled(format!("{status} (press s in the log view)"), styles::text_muted()),
        ]));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "tab/shift-tab field · ctrl-u clear · enter apply · esc cancel · times as YYYY-MM-DDTHH:MM:SS",
            styles::text_muted(),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use tflens_core::LogFilters;

    #[test]
    fn test_form_shows_values_and_status() {
        let filters = LogFilters {
            phase: Some("apply".into()),
            status: Some(StatusFilter::Error),
            ..Default::default()
        };
        let form = FilterForm::from_filters(&filters);
        let mut term = TestTerminal::new();
        let area = term.area();
        term.render_widget(FilterFormPopup::new(&form, filters.status), area);
        assert!(term.buffer_contains("phase: apply"));
        assert!(term.buffer_contains("status: error"));
        assert!(term.buffer_contains("tf_req_id: ▏"));
    }
}
