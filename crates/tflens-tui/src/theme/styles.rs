//! Semantic style builders

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use tflens_app::timeline::Severity;
use tflens_core::{EntryStatus, LogLevel};

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

// --- Accent ---
pub fn accent() -> Style {
    Style::default().fg(palette::ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn keybinding() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

// --- Status ---
pub fn status_green() -> Style {
    Style::default().fg(palette::STATUS_GREEN)
}

pub fn status_red() -> Style {
    Style::default().fg(palette::STATUS_RED)
}

pub fn status_yellow() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

pub fn status_blue() -> Style {
    Style::default().fg(palette::STATUS_BLUE)
}

/// "Black on Cyan" for the focused line of a list
pub fn focused_selected() -> Style {
    Style::default()
        .fg(palette::CONTRAST_FG)
        .bg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn level(level: LogLevel) -> Style {
    let color = match level {
        LogLevel::Error => palette::LOG_ERROR,
        LogLevel::Warning => palette::LOG_WARNING,
        LogLevel::Info => palette::LOG_INFO,
        LogLevel::Trace | LogLevel::Debug | LogLevel::Unknown => palette::LOG_DEBUG,
    };
    Style::default().fg(color)
}

pub fn entry_status(status: EntryStatus) -> Style {
    match status {
        EntryStatus::Ok => text_primary(),
        EntryStatus::Error => status_red(),
        EntryStatus::Malformed => Style::default().fg(palette::BAR_MALFORMED),
    }
}

pub fn bar(severity: Severity) -> Style {
    let color = match severity {
        Severity::Normal => palette::BAR_NORMAL,
        Severity::Error => palette::BAR_ERROR,
        Severity::Malformed => palette::BAR_MALFORMED,
    };
    Style::default().fg(color)
}

// --- Blocks ---
pub fn glass_block(focused: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            accent()
        } else {
            Style::default().fg(palette::BORDER_DIM)
        })
}

pub fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette::BORDER_ACTIVE))
        .style(Style::default().bg(palette::POPUP_BG))
}
