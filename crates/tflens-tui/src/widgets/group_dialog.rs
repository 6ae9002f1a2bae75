//! Export / display group selection dialog

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use tflens_app::dialog::DialogLoad;
use tflens_app::GroupDialog;

use crate::theme::styles;

use super::{fit, modal_overlay};

pub struct GroupDialogPopup<'a> {
    dialog: &'a GroupDialog,
}

impl<'a> GroupDialogPopup<'a> {
    pub fn new(dialog: &'a GroupDialog) -> Self {
        Self { dialog }
    }

    fn hint(&self) -> Line<'static> {
        let confirm = self.dialog.kind.confirm_label();
        let pairs = [
            ("space", "toggle"),
            ("a", "all"),
            ("d", "none"),
            ("m", "mode"),
            ("r", "reload"),
            ("enter", confirm),
            ("esc", "close"),
        ];
        let mut spans = Vec::new();
        for (key, action) in pairs {
            spans.push(Span::styled(key, styles::keybinding()));
            spans.push(Span::styled(format!(" {action}  "), styles::text_muted()));
        }
        Line::from(spans)
    }

    fn list(&self, width: usize, height: usize) -> Vec<Line<'static>> {
        let dialog = self.dialog;
        match &dialog.load {
            DialogLoad::Loading => {
                return vec![Line::from(Span::styled("Loading groups...", styles::text_muted()))]
            }
            DialogLoad::Failed(error) => {
                return vec![Line::from(Span::styled(
                    format!("Failed to load groups: {error}"),
                    styles::status_red(),
                ))]
            }
            DialogLoad::Loaded if dialog.groups.is_empty() => {
                return vec![Line::from(Span::styled("No groups in this run", styles::text_muted()))]
            }
            DialogLoad::Loaded => {}
        }

        let offset = dialog.cursor.saturating_sub(height.saturating_sub(1));
        dialog
            .groups
            .iter()
            .enumerate()
            .skip(offset)
            .take(height)
            .map(|(i, group)| {
                let mark = if dialog.is_checked(&group.key) { "[x] " } else { "[ ] " };
                let name = if group.display_name.is_empty() {
                    &group.key
                } else {
                    &group.display_name
                };
                let count = format!(" ({})", group.count);
                let name = fit(name, width.saturating_sub(4 + count.len()));
                let line = Line::from(vec![
                    Span::styled(mark, styles::keybinding()),
                    Span::styled(name, styles::text_primary()),
                    Span::styled(count, styles::text_muted()),
                ]);
                if i == dialog.cursor {
                    line.style(styles::focused_selected())
                } else {
                    line
                }
            })
            .collect()
    }
}

impl Widget for GroupDialogPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = u16::try_from(self.dialog.groups.len()).unwrap_or(u16::MAX);
        let height = rows
            .saturating_add(6)
            .clamp(9, area.height.saturating_sub(2).max(9));
        let modal = modal_overlay::centered_rect(64, height, area);
        modal_overlay::prepare_modal(buf, area, modal);

        let title = format!(
            "{} · {} · {} selected",
            self.dialog.kind.title(),
            self.dialog.pairing.label(),
            self.dialog.selected.len()
        );
        let block = styles::modal_block(&title);
        let inner = block.inner(modal);
        block.render(modal, buf);
        if inner.height < 3 {
            return;
        }

        let list_area = Rect {
            height: inner.height - 2,
            ..inner
        };
        let lines = self.list(usize::from(inner.width), usize::from(list_area.height));
        Paragraph::new(lines).render(list_area, buf);

        let hint_area = Rect {
            y: inner.bottom() - 1,
            height: 1,
            ..inner
        };
        Paragraph::new(self.hint()).render(hint_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestTerminal;
    use tflens_app::{DialogKind, KeySet};
    use tflens_backend::test_utils::test_group;
    use tflens_core::PairingMode;

    fn dialog() -> GroupDialog {
        let seed: KeySet = ["r2"].into_iter().collect();
        GroupDialog::new(DialogKind::Export, 1, PairingMode::Correlation, seed)
    }

    #[test]
    fn test_loading_dialog() {
        let dialog = dialog();
        let mut term = TestTerminal::new();
        let area = term.area();
        term.render_widget(GroupDialogPopup::new(&dialog), area);
        assert!(term.buffer_contains("Loading groups..."));
        assert!(term.buffer_contains("Export groups"));
    }

    #[test]
    fn test_loaded_dialog_shows_checks_from_seed() {
        let mut dialog = dialog();
        dialog.set_groups(vec![test_group("r1", 4), test_group("r2", 1)]);
        let mut term = TestTerminal::new();
        let area = term.area();
        term.render_widget(GroupDialogPopup::new(&dialog), area);
        assert!(term.buffer_contains("[ ] r1 (4)"));
        assert!(term.buffer_contains("[x] r2 (1)"));
        assert!(term.buffer_contains("1 selected"));
        assert!(term.buffer_contains("export"));
    }

    #[test]
    fn test_failed_listing_is_shown() {
        let mut dialog = dialog();
        dialog.fail("timeout");
        let mut term = TestTerminal::new();
        let area = term.area();
        term.render_widget(GroupDialogPopup::new(&dialog), area);
        assert!(term.buffer_contains("Failed to load groups: timeout"));
    }

    #[test]
    fn test_huge_listing_fits_the_screen() {
        let mut dialog = dialog();
        dialog.set_groups(
            (0..usize::from(u16::MAX))
                .map(|i| test_group(&format!("g{i}"), 1))
                .collect(),
        );
        let mut term = TestTerminal::new();
        let area = term.area();
        term.render_widget(GroupDialogPopup::new(&dialog), area);
        assert!(term.buffer_contains("g0 (1)"));
    }
}
