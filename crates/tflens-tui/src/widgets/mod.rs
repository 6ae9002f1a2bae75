//! Custom widget components

mod detail;
mod filter_form;
mod group_dialog;
mod header;
mod log_tree;
mod message_box;
pub mod modal_overlay;
mod run_input;
mod status_bar;
mod timeline_chart;

pub use detail::DetailPopup;
pub use filter_form::FilterFormPopup;
pub use group_dialog::GroupDialogPopup;
pub use header::RunHeader;
pub use log_tree::LogTree;
pub use message_box::MessageBox;
pub use run_input::RunInputPopup;
pub use status_bar::StatusBar;
pub use timeline_chart::TimelineChart;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate `text` to `width` display columns, ending in `…` when cut
pub(crate) fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
