//! tflens-app - Application state and orchestration for tflens
//!
//! This crate implements the TEA (The Elm Architecture) pattern for state
//! management on top of the grouping engine:
//! - [`store`]: persisted selection state (export pins, display filter,
//!   collapse map, only-pinned flag, read markers)
//! - [`grouping`]: partitioning a page into ordered groups
//! - [`view`]: pure projection of a page and selection into a view tree
//! - [`timeline`]: lane and bar geometry for the timeline chart
//! - [`handler`], [`actions`], [`process`]: the update loop and its
//!   background tasks

pub mod actions;
pub mod config;
pub mod context;
pub mod dialog;
pub mod filter_form;
pub mod grouping;
pub mod handler;
pub mod input_key;
pub mod message;
pub mod process;
pub mod signals;
pub mod state;
pub mod store;
pub mod timeline;
pub mod view;

// Re-export primary types
pub use context::{GroupListContext, RequestContext, TimelineContext};
pub use dialog::{DialogKind, GroupDialog};
pub use grouping::{Group, GroupBuilder, GroupedPage};
pub use handler::{UpdateAction, UpdateResult};
pub use input_key::InputKey;
pub use message::Message;
pub use state::{AppState, UiMode};
pub use store::{FileKvStore, KeySet, KeySetPurpose, MemoryKvStore, SelectionScope, SelectionStore};
pub use timeline::{TimelineLayout, TimelineView};
pub use view::{render, ViewTree};
