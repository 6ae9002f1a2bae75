//! Headless mode - NDJSON output instead of the TUI
//!
//! Loads one page and the timeline of a run through the same update loop
//! the TUI uses, then prints what would have been drawn.
//!
//! # Example Output
//!
//! ```json
//! {"event":"page","run_id":3,"pairing":"tf_req_id","view":{...},"timestamp":1704700001000}
//! {"event":"timeline","run_id":3,"pairing":"tf_req_id","layout":{...},"message":null,"timestamp":1704700001000}
//! ```

pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use serde::Serialize;

use tflens_app::{TimelineLayout, ViewTree};
use tflens_core::prelude::*;
use tflens_core::{PairingMode, RunId};

pub use runner::run_headless;

/// Events emitted in headless mode
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// The rendered log view of the first page
    Page {
        run_id: RunId,
        pairing: PairingMode,
        status: Option<String>,
        view: ViewTree,
        timestamp: i64,
    },

    /// Timeline geometry, or the placeholder text shown instead
    Timeline {
        run_id: RunId,
        pairing: PairingMode,
        layout: Option<TimelineLayout>,
        message: Option<String>,
        timestamp: i64,
    },

    Error {
        message: String,
        fatal: bool,
        timestamp: i64,
    },
}

impl HeadlessEvent {
    /// Write this event to stdout as one JSON line
    pub fn emit(&self) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize headless event: {}", e);
                return;
            }
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", json).and_then(|_| stdout.flush()) {
            error!("Failed to write headless event to stdout: {}", e);
        }
    }

    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    pub fn page(run_id: RunId, pairing: PairingMode, status: Option<String>, view: ViewTree) -> Self {
        Self::Page {
            run_id,
            pairing,
            status,
            view,
            timestamp: Self::now(),
        }
    }

    pub fn timeline(
        run_id: RunId,
        pairing: PairingMode,
        layout: Option<TimelineLayout>,
        message: Option<String>,
    ) -> Self {
        Self::Timeline {
            run_id,
            pairing,
            layout,
            message,
            timestamp: Self::now(),
        }
    }

    pub fn error(message: String, fatal: bool) -> Self {
        Self::Error {
            message,
            fatal,
            timestamp: Self::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_event_serialization() {
        let event = HeadlessEvent::page(3, PairingMode::Resource, None, ViewTree::not_loaded());
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();

        assert_eq!(value["event"], "page");
        assert_eq!(value["run_id"], 3);
        assert_eq!(value["pairing"], "resource");
        assert_eq!(value["view"]["body"]["kind"], "not_loaded");
        assert!(value["timestamp"].is_number());
    }

    #[test]
    fn test_error_event_serialization() {
        let event = HeadlessEvent::error("HTTP 500".to_string(), false);
        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        assert_eq!(value["event"], "error");
        assert_eq!(value["fatal"], false);
    }
}
