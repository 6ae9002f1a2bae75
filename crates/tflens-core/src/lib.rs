//! # tflens-core - Core Domain Types
//!
//! Foundation crate for tflens. Provides the log-entry model, pairing modes
//! and group-key extraction, error handling and logging bootstrap.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`LogEntry`] - One parsed log line of a provisioning run
//! - [`LogsPage`] - A page of entries plus total / extras counters
//! - [`TimelineBar`] - Aggregated activity bucket for one key
//! - [`GroupSummary`] - Group listing row used by selection dialogs
//! - [`LogFilters`], [`StatusFilter`] - Server-side page filters
//!
//! ### Pairing (`pairing`)
//! - [`PairingMode`] - Correlation id / resource / phase
//! - [`GroupKey`] - Structured key with per-mode sentinel
//! - [`extract_key()`] - Total mapping of an entry to its persisted key
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use tflens_core::prelude::*;
//! ```

pub mod error;
pub mod logging;
pub mod pairing;
pub mod prelude;
pub mod timestamp;
pub mod types;

pub use error::{Error, Result, ResultExt};
pub use pairing::{
    extract_key, GroupKey, PairingMode, ResourceKey, NO_CORRELATION, NO_PHASE, NO_RESOURCE,
};
pub use types::{
    EntryId, EntryStatus, GroupSummary, LogEntry, LogFilters, LogLevel, LogsPage, RunId,
    StatusFilter, TimelineBar,
};
