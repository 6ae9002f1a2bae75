//! Handler module - TEA update function and event handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `keys`: Key event handlers for UI modes
//! - `logs`: Run selection, paging, grouping and filter handlers
//! - `dialogs`: Export / display selection dialog handlers
//! - `timeline`: Timeline focus, pairing and click handlers
//! - `export`: Download requests and their completions

pub(crate) mod dialogs;
pub(crate) mod export;
pub(crate) mod keys;
pub(crate) mod logs;
pub(crate) mod timeline;
pub(crate) mod update;


use std::path::PathBuf;

use tflens_backend::ExportRequest;

use crate::context::{GroupListContext, RequestContext, TimelineContext};
use crate::message::Message;

// Re-export main entry point
pub use keys::handle_key;
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateAction {
    /// Fetch a log page; the completion carries the same context back
    FetchLogs(RequestContext),

    /// Fetch timeline bars for a run and pairing mode
    FetchTimeline(TimelineContext),

    /// List groups for the open selection dialog
    FetchGroups(GroupListContext),

    /// Save an export body under `dest`
    Download {
        request: ExportRequest,
        dest: PathBuf,
    },
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    /// Perform `action`, then process `msg`
    pub fn action_then(action: UpdateAction, msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: Some(action),
        }
    }
}
