//! Color palette

use ratatui::style::Color;

// --- Background layers ---
pub const DEEPEST_BG: Color = Color::Black;
pub const POPUP_BG: Color = Color::Rgb(28, 33, 43);

// --- Borders ---
pub const BORDER_DIM: Color = Color::DarkGray;
pub const BORDER_ACTIVE: Color = Color::Cyan;

// --- Accent ---
pub const ACCENT: Color = Color::Cyan;
pub const CONTRAST_FG: Color = Color::Black;

// --- Text ---
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Gray;
pub const TEXT_MUTED: Color = Color::DarkGray;

// --- Status ---
pub const STATUS_GREEN: Color = Color::Green;
pub const STATUS_RED: Color = Color::Red;
pub const STATUS_YELLOW: Color = Color::Yellow;
pub const STATUS_BLUE: Color = Color::Blue;

// --- Timeline bars ---
pub const BAR_NORMAL: Color = Color::Rgb(88, 166, 255);
pub const BAR_ERROR: Color = Color::Rgb(244, 63, 94);
/// Malformed buckets are drawn in a distinct hue from plain errors
pub const BAR_MALFORMED: Color = Color::Rgb(217, 70, 239);

/// Background of every other lane
pub const LANE_STRIPE: Color = Color::Rgb(22, 27, 34);

// --- Log levels ---
pub const LOG_ERROR: Color = Color::Red;
pub const LOG_WARNING: Color = Color::Yellow;
pub const LOG_INFO: Color = Color::Green;
pub const LOG_DEBUG: Color = Color::DarkGray;

// --- Effects ---
pub const SHADOW: Color = Color::Black;
