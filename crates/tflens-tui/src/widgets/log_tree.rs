//! Log pane: the grouped or flat view tree with a line cursor

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use tflens_app::state::LogsStatus;
use tflens_app::view::{GroupView, RowView, ViewBody, ViewLine};
use tflens_app::ViewTree;
use tflens_core::LogLevel;

use crate::theme::styles;

use super::fit;

pub struct LogTree<'a> {
    tree: &'a ViewTree,
    status: &'a LogsStatus,
    cursor: usize,
    focused: bool,
}

impl<'a> LogTree<'a> {
    pub fn new(tree: &'a ViewTree, status: &'a LogsStatus) -> Self {
        Self {
            tree,
            status,
            cursor: 0,
            focused: true,
        }
    }

    pub fn cursor(mut self, cursor: usize) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn header_line(group: &GroupView, width: usize) -> Line<'static> {
        let arrow = if group.collapsed { "▸" } else { "▾" };
        let pin = if group.pinned { "[x]" } else { "[ ]" };
        let label_style = if group.sentinel {
            styles::text_muted().add_modifier(Modifier::ITALIC)
        } else {
            styles::accent_bold()
        };
        let mut spans = vec![
            Span::styled(format!("{arrow} "), styles::text_secondary()),
            Span::styled(format!("{pin} "), styles::keybinding()),
            Span::styled(fit(&group.label, width.saturating_sub(24)), label_style),
            Span::styled(format!(" ({})", group.rows.len()), styles::text_muted()),
        ];
        if group.error_count > 0 {
            spans.push(Span::styled(
                format!(" ✗ {}", group.error_count),
                styles::status_red(),
            ));
        }
        Line::from(spans)
    }

    fn row_line(row: &RowView, indent: bool) -> Line<'static> {
        let level = LogLevel::from_text(Some(row.level.as_str()));
        let mut spans = Vec::new();
        if indent {
            spans.push(Span::raw("    "));
        }
        spans.push(Span::styled(
            if row.unread { "• " } else { "  " },
            styles::accent(),
        ));
        if row.extra {
            spans.push(Span::styled("+ ", styles::text_muted()));
        }
        spans.push(Span::styled(format!("{:<19} ", row.time), styles::text_muted()));
        spans.push(Span::styled(format!("{} ", level.badge()), styles::level(level)));
        spans.push(Span::styled(row.message.clone(), styles::entry_status(row.status)));
        Line::from(spans)
    }

    /// Placeholder for states without a body
    fn placeholder(&self) -> Option<Line<'static>> {
        match (self.status, &self.tree.body) {
            (LogsStatus::Failed(error), _) => Some(Line::from(Span::styled(
                format!("Failed to load logs: {error}"),
                styles::status_red(),
            ))),
            (LogsStatus::Loading, ViewBody::NotLoaded) => {
                Some(Line::from(Span::styled("Loading…", styles::text_muted())))
            }
            (_, ViewBody::NotLoaded) => Some(Line::from(Span::styled(
                "No run selected. Press r to enter a run id.",
                styles::text_muted(),
            ))),
            _ => None,
        }
    }
}

impl Widget for LogTree<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = styles::glass_block(self.focused).title(" Logs ");
        if !self.tree.status_line.is_empty() {
            block = block.title_bottom(Line::from(format!(" {} ", self.tree.status_line)).right_aligned());
        }
        let inner = block.inner(area);
        block.render(area, buf);

        if let Some(line) = self.placeholder() {
            Paragraph::new(line).render(inner, buf);
            return;
        }

        let width = usize::from(inner.width);
        let mut lines: Vec<Line<'static>> = self
            .tree
            .notices
            .iter()
            .map(|n| Line::from(Span::styled(n.text(), styles::status_yellow())))
            .collect();

        let body_height = usize::from(inner.height).saturating_sub(lines.len()).max(1);
        let offset = self.cursor.saturating_sub(body_height - 1);
        let grouped = matches!(self.tree.body, ViewBody::Grouped(_));

        for (index, line) in self.tree.lines().into_iter().enumerate().skip(offset).take(body_height) {
            let mut rendered = match line {
                ViewLine::Header { group } => match self.tree.group(group) {
                    Some(g) => Self::header_line(g, width),
                    None => continue,
                },
                ViewLine::Row { .. } => match self.tree.row(line) {
                    Some(row) => Self::row_line(row, grouped),
                    None => continue,
                },
            };
            if index == self.cursor && self.focused {
                rendered = rendered.style(Style::default().add_modifier(Modifier::REVERSED));
            }
            lines.push(rendered);
        }

        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{state_with_page, TestTerminal};
    use tflens_backend::test_utils::test_entry;

    fn render(tree: &ViewTree, status: &LogsStatus, cursor: usize) -> TestTerminal {
        let mut term = TestTerminal::with_size(80, 12);
        let area = term.area();
        term.render_widget(LogTree::new(tree, status).cursor(cursor), area);
        term
    }

    #[test]
    fn test_not_loaded_prompts_for_run() {
        let term = render(&ViewTree::not_loaded(), &LogsStatus::Idle, 0);
        assert!(term.buffer_contains("No run selected"));
    }

    #[test]
    fn test_failed_fetch_is_inline() {
        let status = LogsStatus::Failed("HTTP 500".into());
        let term = render(&ViewTree::not_loaded(), &status, 0);
        assert!(term.buffer_contains("Failed to load logs: HTTP 500"));
    }

    #[test]
    fn test_groups_render_headers_and_rows() {
        let state = state_with_page(vec![
            test_entry(1, Some("req-a")),
            test_entry(2, None),
        ]);
        let tree = state.view();
        let term = render(&tree, &state.logs_status, 0);
        assert!(term.buffer_contains("▾ [ ] req-a (1)"));
        assert!(term.buffer_contains("(no correlation id)"));
        assert!(term.buffer_contains("entry 1"));
        assert!(term.buffer_contains("page 1"));
    }

    #[test]
    fn test_collapsed_group_hides_rows() {
        let mut state = state_with_page(vec![test_entry(1, Some("req-a"))]);
        let scope = state.scope().unwrap();
        state.store.toggle_collapsed(scope, "req-a");
        let tree = state.view();
        let term = render(&tree, &state.logs_status, 0);
        assert!(term.buffer_contains("▸ [ ] req-a"));
        assert!(!term.buffer_contains("entry 1"));
    }

    #[test]
    fn test_notices_render_above_body() {
        let state = state_with_page(vec![]);
        let tree = state.view();
        let term = render(&tree, &state.logs_status, 0);
        assert!(term.line(1).contains("No entries match the current filters"));
    }
}
