//! Shared modal overlay helpers: centering, dimming and shadows

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Clear, Widget};

use crate::theme::palette;

/// Center a fixed-size rect within `area`, clamped to its size
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Dim every cell of `area` behind a modal
pub fn dim_background(buf: &mut Buffer, area: Rect) {
    let dim_style = Style::default()
        .fg(palette::TEXT_MUTED)
        .bg(palette::DEEPEST_BG);
    let area = area.intersection(buf.area);
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_style(dim_style);
            }
        }
    }
}

/// One-cell shadow along the right and bottom edges of `modal`
pub fn render_shadow(buf: &mut Buffer, modal: Rect) {
    let style = Style::default().fg(palette::SHADOW).bg(palette::SHADOW);
    let right = modal.right();
    let bottom = modal.bottom();
    for y in modal.y.saturating_add(1)..=bottom {
        if let Some(cell) = buf.cell_mut((right, y)) {
            cell.set_char(' ');
            cell.set_style(style);
        }
    }
    for x in modal.x.saturating_add(1)..=right {
        if let Some(cell) = buf.cell_mut((x, bottom)) {
            cell.set_char(' ');
            cell.set_style(style);
        }
    }
}

/// Dim the screen, then clear and shadow the modal rect
pub fn prepare_modal(buf: &mut Buffer, screen: Rect, modal: Rect) {
    dim_background(buf, screen);
    render_shadow(buf, modal);
    Clear.render(modal, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_within_area() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect(40, 10, area), Rect::new(20, 7, 40, 10));
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 30, 10);
        let result = centered_rect(40, 12, area);
        assert_eq!((result.width, result.height), (30, 10));
    }

    #[test]
    fn test_shadow_stays_inside_buffer() {
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        // Modal touching the edges: shadow cells fall outside and are skipped
        render_shadow(&mut buf, Rect::new(0, 0, 10, 5));
        dim_background(&mut buf, Rect::new(0, 0, 20, 20));
    }
}
