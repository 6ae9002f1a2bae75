//! Test utilities for TUI rendering verification
//!
//! Wraps ratatui's TestBackend so widget and full-screen tests can assert
//! on rendered text.

use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;
use ratatui::{Frame, Terminal};

use tflens_app::message::Message;
use tflens_app::{handler, AppState, UpdateAction};
use tflens_core::{LogEntry, LogsPage, TimelineBar};

pub const TEST_WIDTH: u16 = 100;
pub const TEST_HEIGHT: u16 = 32;

pub struct TestTerminal {
    pub terminal: Terminal<TestBackend>,
}

impl TestTerminal {
    pub fn new() -> Self {
        Self::with_size(TEST_WIDTH, TEST_HEIGHT)
    }

    pub fn with_size(width: u16, height: u16) -> Self {
        let terminal =
            Terminal::new(TestBackend::new(width, height)).expect("Failed to create test terminal");
        Self { terminal }
    }

    pub fn area(&self) -> Rect {
        let size = self.terminal.size().expect("Failed to get terminal size");
        Rect::new(0, 0, size.width, size.height)
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        self.terminal
            .draw(|frame| frame.render_widget(widget, area))
            .expect("Failed to render widget");
    }

    /// Draw a full frame, e.g. with `render::view`
    pub fn draw_with<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(f).expect("Failed to draw frame");
    }

    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    pub fn buffer_contains(&self, text: &str) -> bool {
        self.content().contains(text)
    }

    pub fn line(&self, y: u16) -> String {
        let buffer = self.buffer();
        let mut result = String::new();
        if y < buffer.area.height {
            for x in 0..buffer.area.width {
                result.push_str(buffer[(x, y)].symbol());
            }
        }
        result
    }

    pub fn content(&self) -> String {
        (0..self.buffer().area.height)
            .map(|y| self.line(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for TestTerminal {
    fn default() -> Self {
        Self::new()
    }
}

/// State with run 1 selected and `entries` loaded as page 1
pub fn state_with_page(entries: Vec<LogEntry>) -> AppState {
    let mut state = AppState::new();
    let result = handler::update(&mut state, Message::SelectRun(1));
    if let Some(UpdateAction::FetchLogs(context)) = result.action {
        let page = LogsPage {
            total: entries.len() as u64,
            items: entries,
            extras: 0,
        };
        handler::update(&mut state, Message::LogsLoaded { context, page });
    }
    state
}

/// Deliver `bars` as the current timeline
pub fn load_timeline(state: &mut AppState, bars: Vec<TimelineBar>) {
    let result = handler::update(state, Message::ReloadTimeline);
    if let Some(UpdateAction::FetchTimeline(context)) = result.action {
        handler::update(state, Message::TimelineLoaded { context, bars });
    }
}
