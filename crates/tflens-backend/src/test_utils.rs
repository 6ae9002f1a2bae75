//! Test utilities for backend consumers
//!
//! Provides an in-memory [`ScriptedBackend`] plus fixture builders for
//! entries and timeline bars.

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use tflens_core::prelude::*;
use tflens_core::{GroupSummary, LogEntry, LogsPage, PairingMode, RunId, TimelineBar};

use crate::client::LogBackend;
use crate::query::{ExportRequest, LogQuery};

/// A call observed by [`ScriptedBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Logs(LogQuery),
    Timeline { run_id: RunId, pairing: PairingMode },
    Groups { run_id: RunId, pairing: PairingMode },
    Download(ExportRequest),
}

#[derive(Debug, Default)]
struct Script {
    entries: Vec<LogEntry>,
    extras: Vec<LogEntry>,
    bars: Vec<TimelineBar>,
    groups: Vec<GroupSummary>,
    export_body: Vec<u8>,
    failure: Option<String>,
    calls: Vec<BackendCall>,
}

/// In-memory backend serving a fixed entry list with real paging.
///
/// Clones share the same script, so a test can keep a handle for
/// assertions after moving one into the code under test.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(self, entries: Vec<LogEntry>) -> Self {
        self.lock().entries = entries;
        self
    }

    /// Rows appended to every page when `include_pairs` is requested
    pub fn with_extras(self, extras: Vec<LogEntry>) -> Self {
        self.lock().extras = extras;
        self
    }

    pub fn with_bars(self, bars: Vec<TimelineBar>) -> Self {
        self.lock().bars = bars;
        self
    }

    pub fn with_groups(self, groups: Vec<GroupSummary>) -> Self {
        self.lock().groups = groups;
        self
    }

    pub fn with_export_body(self, body: impl Into<Vec<u8>>) -> Self {
        self.lock().export_body = body.into();
        self
    }

    /// Make every subsequent call fail with an HTTP error
    pub fn fail_with(&self, message: impl Into<String>) {
        self.lock().failure = Some(message.into());
    }

    pub fn recover(&self) {
        self.lock().failure = None;
    }

    /// Calls observed so far, in issue order
    pub fn calls(&self) -> Vec<BackendCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        match self.script.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn record(&self, call: BackendCall) -> Result<()> {
        let mut script = self.lock();
        script.calls.push(call);
        match &script.failure {
            Some(message) => Err(Error::http(message.clone())),
            None => Ok(()),
        }
    }
}

impl LogBackend for ScriptedBackend {
    async fn fetch_logs(&self, query: &LogQuery) -> Result<LogsPage> {
        self.record(BackendCall::Logs(query.clone()))?;
        let script = self.lock();

        let filtered: Vec<&LogEntry> = script
            .entries
            .iter()
            .filter(|e| e.run_id == query.run_id)
            .filter(|e| match query.filters.correlation_id.as_deref() {
                Some(needle) => e
                    .correlation_id
                    .as_deref()
                    .is_some_and(|id| id.contains(needle)),
                None => true,
            })
            .filter(|e| match query.filters.resource_type.as_deref() {
                Some(needle) => e
                    .resource_type
                    .as_deref()
                    .is_some_and(|t| t.contains(needle)),
                None => true,
            })
            .filter(|e| match query.filters.phase.as_deref() {
                Some(phase) => e.phase.as_deref() == Some(phase),
                None => true,
            })
            .collect();

        let skip = (query.page.saturating_sub(1) * query.page_size) as usize;
        let mut items: Vec<LogEntry> = filtered
            .iter()
            .skip(skip)
            .take(query.page_size as usize)
            .map(|e| (*e).clone())
            .collect();

        let mut extras = 0;
        if query.include_pairs {
            for extra in &script.extras {
                let mut extra = extra.clone();
                extra.is_extra = true;
                items.push(extra);
                extras += 1;
            }
        }

        Ok(LogsPage {
            total: filtered.len() as u64,
            items,
            extras,
        })
    }

    async fn fetch_timeline(
        &self,
        run_id: RunId,
        pairing: PairingMode,
    ) -> Result<Vec<TimelineBar>> {
        self.record(BackendCall::Timeline { run_id, pairing })?;
        Ok(self.lock().bars.clone())
    }

    async fn fetch_groups(
        &self,
        run_id: RunId,
        pairing: PairingMode,
    ) -> Result<Vec<GroupSummary>> {
        self.record(BackendCall::Groups { run_id, pairing })?;
        Ok(self.lock().groups.clone())
    }

    async fn download(&self, request: &ExportRequest, dest: &Path) -> Result<u64> {
        self.record(BackendCall::Download(request.clone()))?;
        let body = self.lock().export_body.clone();
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &body).await?;
        Ok(body.len() as u64)
    }
}

/// Creates an entry of run 1 with an optional correlation id
pub fn test_entry(id: i64, correlation_id: Option<&str>) -> LogEntry {
    let mut entry = LogEntry::new(id, 1, format!("entry {id}"));
    entry.correlation_id = correlation_id.map(str::to_string);
    entry
}

/// Milliseconds since the epoch as a UTC timestamp
pub fn ts_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Creates a timeline bar spanning `start_ms..end_ms`
pub fn test_bar(key: &str, start_ms: i64, end_ms: i64, count: u64) -> TimelineBar {
    TimelineBar {
        key: key.to_string(),
        start: ts_millis(start_ms),
        end: ts_millis(end_ms),
        count,
        error_count: 0,
        malformed_count: 0,
    }
}

/// Creates a group listing row
pub fn test_group(key: &str, count: u64) -> GroupSummary {
    GroupSummary {
        key: key.to_string(),
        display_name: key.to_string(),
        kind: "tf_req_id".to_string(),
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(n: i64) -> Vec<LogEntry> {
        (1..=n).map(|i| test_entry(i, Some("r1"))).collect()
    }

    fn query(page: u32, page_size: u32) -> LogQuery {
        LogQuery {
            run_id: 1,
            page,
            page_size,
            pairing: PairingMode::Correlation,
            include_pairs: false,
            filters: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_pages_entries() {
        let backend = ScriptedBackend::new().with_entries(entries(5));
        let page = backend.fetch_logs(&query(3, 2)).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.iter().map(|e| e.id).collect::<Vec<_>>(), vec![5]);
    }

    #[tokio::test]
    async fn test_filters_by_correlation_substring() {
        let mut list = entries(2);
        list.push(test_entry(3, Some("778")));
        let backend = ScriptedBackend::new().with_entries(list);
        let mut q = query(1, 10);
        q.filters.correlation_id = Some("77".into());
        let page = backend.fetch_logs(&q).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, 3);
    }

    #[tokio::test]
    async fn test_failure_toggle_and_call_log() {
        let backend = ScriptedBackend::new();
        backend.fail_with("boom");
        let err = backend
            .fetch_timeline(1, PairingMode::Phase)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http { .. }));
        backend.recover();
        assert!(backend.fetch_groups(1, PairingMode::Phase).await.is_ok());
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_download_writes_body_into_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("exports").join("run-1.jsonl");
        let backend = ScriptedBackend::new().with_export_body("{}\n");
        let bytes = backend
            .download(&ExportRequest::Run { run_id: 1 }, &dest)
            .await
            .unwrap();
        assert_eq!(bytes, 3);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "{}\n");
    }

    #[test]
    fn test_bar_fixture() {
        let bar = test_bar("a", 0, 1000, 5);
        assert_eq!((bar.end - bar.start).num_milliseconds(), 1000);
    }
}
