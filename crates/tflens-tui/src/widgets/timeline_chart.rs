//! Timeline chart: one lane per bar, drawn cell by cell
//!
//! Layout units from [`TimelineLayout`] are scaled onto the columns left of
//! the label gutter. Every bar keeps at least one cell.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use tflens_app::timeline::{BarLayout, Severity};
use tflens_app::{TimelineLayout, TimelineView};
use tflens_core::PairingMode;

use crate::theme::{palette, styles};

use super::fit;

const BAR_SYMBOL: &str = "█";

pub struct TimelineChart<'a> {
    view: &'a TimelineView,
    pairing: PairingMode,
    cursor: usize,
    focused: bool,
}

impl<'a> TimelineChart<'a> {
    pub fn new(view: &'a TimelineView, pairing: PairingMode) -> Self {
        Self {
            view,
            pairing,
            cursor: 0,
            focused: false,
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
}

/// Map a layout unit onto `cols` columns
fn scale(x: u32, chart_width: u32, cols: u16) -> u16 {
    let scaled = u64::from(x) * u64::from(cols) / u64::from(chart_width.max(1));
    scaled.min(u64::from(cols)) as u16
}

/// Column span `[start, end)` of a bar within `cols` columns
fn bar_columns(bar: &BarLayout, chart_width: u32, cols: u16) -> (u16, u16) {
    let start = scale(bar.x1, chart_width, cols).min(cols.saturating_sub(1));
    let end = scale(bar.x1.saturating_add(bar.width), chart_width, cols).clamp(start + 1, cols.max(1));
    (start, end)
}

fn draw_lane(
    buf: &mut Buffer,
    area: Rect,
    gutter: u16,
    layout: &TimelineLayout,
    bar: &BarLayout,
    selected: Option<bool>,
) {
    let label_style = match selected {
        Some(true) => styles::focused_selected(),
        Some(false) => styles::accent_bold(),
        None => styles::text_secondary(),
    };
    let label = fit(&bar.label, usize::from(gutter.saturating_sub(1)));
    buf.set_stringn(area.x, area.y, &label, usize::from(gutter), label_style);

    let cols = area.width.saturating_sub(gutter);
    if cols == 0 {
        return;
    }
    let (start, end) = bar_columns(bar, layout.chart_width, cols);
    let style = styles::bar(bar.severity);
    for col in start..end {
        buf.set_string(area.x + gutter + col, area.y, BAR_SYMBOL, style);
    }

    if bar.show_count {
        let text = bar.count.to_string();
        let len = text.len() as u16;
        if end - start > len + 1 {
            let inverse = styles::focused_selected().bg(style.fg.unwrap_or_default());
            buf.set_string(area.x + gutter + start + 1, area.y, &text, inverse);
        }
    }
}

fn draw_axis(buf: &mut Buffer, area: Rect, gutter: u16, layout: &TimelineLayout) {
    let cols = area.width.saturating_sub(gutter);
    let mut next_free = 0u16;
    for tick in &layout.ticks {
        let col = scale(tick.x, layout.chart_width, cols);
        let len = tick.label.len() as u16;
        // right-most tick is pulled in so it stays on screen
        let col = col.min(cols.saturating_sub(len));
        if col < next_free {
            continue;
        }
        buf.set_string(area.x + gutter + col, area.y, &tick.label, styles::text_muted());
        next_free = col + len + 1;
    }
}

fn legend() -> Vec<Span<'static>> {
    [Severity::Normal, Severity::Error, Severity::Malformed]
        .into_iter()
        .flat_map(|s| {
            [
                Span::styled(format!("  {BAR_SYMBOL}"), styles::bar(s)),
                Span::styled(format!(" {}", s.label()), styles::text_muted()),
            ]
        })
        .collect()
}

impl Widget for TimelineChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" Timeline · {} ", self.pairing.label());
        let block = styles::glass_block(self.focused).title(title);
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let layout = match self.view {
            TimelineView::Ready(layout) => layout,
            other => {
                let text = other.placeholder().unwrap_or_default();
                let style = match other {
                    TimelineView::Failed(_) => styles::status_red(),
                    _ => styles::text_muted(),
                };
                Paragraph::new(Line::from(Span::styled(text, style))).render(inner, buf);
                return;
            }
        };

        let mut header = vec![Span::styled(layout.header.clone(), styles::text_primary())];
        header.extend(legend());
        Paragraph::new(Line::from(header)).render(Rect { height: 1, ..inner }, buf);

        let lanes_height = inner.height.saturating_sub(2);
        let widest = layout
            .bars
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(0);
        let gutter = u16::try_from(widest)
            .unwrap_or(u16::MAX)
            .saturating_add(1)
            .min(inner.width / 3);

        let visible = usize::from(lanes_height);
        let offset = self.cursor.saturating_sub(visible.saturating_sub(1));
        for (row, bar) in layout.bars.iter().skip(offset).take(visible).enumerate() {
            let selected = (bar.lane == self.cursor).then_some(self.focused);
            let lane_area = Rect {
                y: inner.y + 1 + row as u16,
                height: 1,
                ..inner
            };
            if bar.lane % 2 == 1 {
                buf.set_style(lane_area, Style::default().bg(palette::LANE_STRIPE));
            }
            draw_lane(buf, lane_area, gutter, layout, bar, selected);
        }

        if inner.height >= 2 {
            let axis_area = Rect {
                y: inner.bottom() - 1,
                height: 1,
                ..inner
            };
            draw_axis(buf, axis_area, gutter, layout);
        }
    }
}
