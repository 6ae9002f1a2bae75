//! # tflens-backend - Log Backend Client
//!
//! Read contracts consumed by the viewer: log pages, timeline buckets and
//! group listings, plus export downloads.
//!
//! Depends on [`tflens_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! - [`LogBackend`] / [`LocalLogBackend`] - Async trait over the backend
//! - [`HttpBackend`] - reqwest implementation
//! - [`LogQuery`] - Parameters of a log-page request
//! - [`ExportRequest`] - Export downloads (by keys, whole run, timeline)
//! - [`Endpoints`] - URL building relative to the API root
//!
//! With the `test-helpers` feature, `test_utils` provides a scripted
//! in-memory backend.

pub mod client;
pub mod query;
pub mod wire;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_utils;

pub use client::{HttpBackend, LocalLogBackend, LogBackend};
pub use query::{Endpoints, ExportRequest, LogQuery};
