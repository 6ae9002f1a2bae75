//! Screen layout for the main view
//!
//! Header, timeline chart, log tree and status bar stacked vertically.
//! The chart grows with its lane count up to a cap so the log tree keeps
//! most of the screen.

use ratatui::layout::{Constraint, Layout, Rect};

/// Rows the chart needs besides its lanes: borders, header line, axis
const TIMELINE_CHROME: u16 = 4;
const TIMELINE_MIN_HEIGHT: u16 = 5;
const TIMELINE_MAX_HEIGHT: u16 = 14;

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Run, pairing mode and paging summary
    pub header: Rect,
    pub timeline: Rect,
    pub logs: Rect,
    pub status: Rect,
}

/// Chart height for `lanes` bars
pub fn timeline_height(lanes: usize) -> u16 {
    let lanes = u16::try_from(lanes).unwrap_or(u16::MAX);
    lanes
        .saturating_add(TIMELINE_CHROME)
        .clamp(TIMELINE_MIN_HEIGHT, TIMELINE_MAX_HEIGHT)
}

/// Split `area` into the main screen areas
pub fn create(area: Rect, lanes: usize) -> ScreenAreas {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(timeline_height(lanes)),
        Constraint::Min(3),
        Constraint::Length(2),
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        timeline: chunks[1],
        logs: chunks[2],
        status: chunks[3],
    }
}
