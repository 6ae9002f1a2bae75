//! Core domain type definitions
//!
//! Field names on the wire follow the backend's JSON (`tf_req_id`,
//! `tf_resource_type`, ...); Rust-side names describe what the field means.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// Identifier of an uploaded provisioning run
pub type RunId = i64;

/// Identifier of a log entry, unique within a run
pub type EntryId = i64;

/// Severity of a log entry as reported by the upstream parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    /// Level missing or not recognised
    Unknown,
}

impl LogLevel {
    /// Parse the backend's free-form level text
    pub fn from_text(level: Option<&str>) -> Self {
        match level.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
            Some("trace") => LogLevel::Trace,
            Some("debug") => LogLevel::Debug,
            Some("info") => LogLevel::Info,
            Some("warn") | Some("warning") => LogLevel::Warning,
            Some("error") => LogLevel::Error,
            _ => LogLevel::Unknown,
        }
    }

    /// Short badge text for display
    pub fn badge(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRC",
            LogLevel::Debug => "DBG",
            LogLevel::Info => "INF",
            LogLevel::Warning => "WRN",
            LogLevel::Error => "ERR",
            LogLevel::Unknown => "   ",
        }
    }
}

/// Row classification derived from the entry flags.
///
/// Malformed wins over error; everything else is ok.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Ok,
    Error,
    Malformed,
}

/// A single parsed log line of a provisioning run.
///
/// Entries are immutable and owned by the page they were fetched with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: EntryId,
    pub run_id: RunId,
    #[serde(default, with = "timestamp::option")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub phase: Option<String>,
    #[serde(default, rename = "tf_req_id")]
    pub correlation_id: Option<String>,
    #[serde(default, rename = "tf_resource_type")]
    pub resource_type: Option<String>,
    #[serde(default, rename = "tf_resource_name")]
    pub resource_name: Option<String>,
    #[serde(default)]
    pub message: String,
    /// Structured payload; the backend sends either a JSON string or an object
    #[serde(default, rename = "json", alias = "data_json")]
    pub payload: Option<serde_json::Value>,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub is_malformed: bool,
    /// Row added by the backend because it shares a key with the page
    #[serde(default, deserialize_with = "timestamp::null_as_false")]
    pub is_extra: bool,
}

impl LogEntry {
    /// Create a bare entry, mostly useful for tests and fixtures
    pub fn new(id: EntryId, run_id: RunId, message: impl Into<String>) -> Self {
        Self {
            id,
            run_id,
            timestamp: None,
            level: None,
            phase: None,
            correlation_id: None,
            resource_type: None,
            resource_name: None,
            message: message.into(),
            payload: None,
            is_error: false,
            is_malformed: false,
            is_extra: false,
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_resource(mut self, resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self.resource_name = Some(name.into());
        self
    }

    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    pub fn with_timestamp(mut self, ts: DateTime<Utc>) -> Self {
        self.timestamp = Some(ts);
        self
    }

    pub fn level_kind(&self) -> LogLevel {
        LogLevel::from_text(self.level.as_deref())
    }

    pub fn status(&self) -> EntryStatus {
        if self.is_malformed {
            EntryStatus::Malformed
        } else if self.is_error {
            EntryStatus::Error
        } else {
            EntryStatus::Ok
        }
    }

    /// Format timestamp for display
    pub fn formatted_time(&self) -> String {
        self.timestamp
            .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default()
    }

    /// First `max_chars` characters of the message, on a single line
    pub fn message_preview(&self, max_chars: usize) -> String {
        self.message
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .take(max_chars)
            .collect()
    }

    /// Pretty-printed payload. String payloads holding JSON are decoded
    /// first; anything unparsable is shown verbatim.
    pub fn payload_pretty(&self) -> Option<String> {
        let payload = self.payload.as_ref()?;
        let value = match payload {
            serde_json::Value::Null => return None,
            serde_json::Value::String(s) => match serde_json::from_str::<serde_json::Value>(s) {
                Ok(v) => v,
                Err(_) => return Some(s.clone()),
            },
            other => other.clone(),
        };
        serde_json::to_string_pretty(&value).ok()
    }
}

/// One page of log entries as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogsPage {
    pub total: u64,
    #[serde(default)]
    pub items: Vec<LogEntry>,
    /// Number of extra paired rows appended to `items`
    #[serde(default)]
    pub extras: u64,
}

/// Aggregated activity bucket for one key, produced by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineBar {
    pub key: String,
    #[serde(with = "timestamp::required")]
    pub start: DateTime<Utc>,
    #[serde(with = "timestamp::required")]
    pub end: DateTime<Utc>,
    pub count: u64,
    #[serde(default, rename = "errors")]
    pub error_count: u64,
    #[serde(default, rename = "malformed")]
    pub malformed_count: u64,
}

/// A group known to the backend, used to populate selection dialogs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub key: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub count: u64,
}

/// Status filter accepted by the logs endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Error,
    Ok,
    Malformed,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Error => "error",
            StatusFilter::Ok => "ok",
            StatusFilter::Malformed => "malformed",
        }
    }

    /// Cycle none → error → ok → malformed → none
    pub fn cycle(current: Option<StatusFilter>) -> Option<StatusFilter> {
        match current {
            None => Some(StatusFilter::Error),
            Some(StatusFilter::Error) => Some(StatusFilter::Ok),
            Some(StatusFilter::Ok) => Some(StatusFilter::Malformed),
            Some(StatusFilter::Malformed) => None,
        }
    }
}

/// Server-side filters applied to the log page request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilters {
    /// Substring match on the correlation id
    pub correlation_id: Option<String>,
    /// Substring match on the resource type
    pub resource_type: Option<String>,
    pub phase: Option<String>,
    pub level: Option<String>,
    pub status: Option<StatusFilter>,
    /// Free-text search over message and payload
    pub search: Option<String>,
    pub ts_from: Option<DateTime<Utc>>,
    pub ts_to: Option<DateTime<Utc>>,
}

impl LogFilters {
    /// True when no filter narrows the page
    pub fn is_empty(&self) -> bool {
        *self == LogFilters::default()
    }

    /// Query parameters for the logs endpoint. Blank values are omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |name: &'static str, value: &Option<String>| {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((name, v.to_string()));
            }
        };
        push("tf_req_id", &self.correlation_id);
        push("tf_resource_type", &self.resource_type);
        push("phase", &self.phase);
        push("level", &self.level);
        push("search", &self.search);
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(from) = self.ts_from {
            pairs.push(("ts_from", timestamp::to_wire(&from)));
        }
        if let Some(to) = self.ts_to {
            pairs.push(("ts_to", timestamp::to_wire(&to)));
        }
        pairs
    }

    /// One-line summary of the active filters for the status bar
    pub fn summary(&self) -> String {
        self.query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_entry_deserializes_backend_shape() {
        let json = r#"{
            "id": 7, "run_id": 2, "timestamp": "2024-03-01T10:00:05",
            "level": "info", "phase": "apply", "tf_req_id": "r1",
            "tf_resource_type": "aws_instance", "tf_resource_name": "web",
            "message": "hello", "is_error": false, "is_malformed": false,
            "json": "{\"a\":1}", "is_extra": null
        }"#;
        let entry: LogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, 7);
        assert_eq!(entry.correlation_id.as_deref(), Some("r1"));
        assert_eq!(entry.resource_type.as_deref(), Some("aws_instance"));
        assert!(!entry.is_extra);
        assert_eq!(
            entry.timestamp,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 5).unwrap())
        );
    }

    #[test]
    fn test_entry_status_prefers_malformed() {
        let mut entry = LogEntry::new(1, 1, "x");
        assert_eq!(entry.status(), EntryStatus::Ok);
        entry.is_error = true;
        assert_eq!(entry.status(), EntryStatus::Error);
        entry.is_malformed = true;
        assert_eq!(entry.status(), EntryStatus::Malformed);
    }

    #[test]
    fn test_payload_pretty_decodes_string_json() {
        let mut entry = LogEntry::new(1, 1, "x");
        entry.payload = Some(serde_json::Value::String("{\"a\":1}".into()));
        assert_eq!(entry.payload_pretty().unwrap(), "{\n  \"a\": 1\n}");

        entry.payload = Some(serde_json::Value::String("not json".into()));
        assert_eq!(entry.payload_pretty().unwrap(), "not json");

        entry.payload = None;
        assert!(entry.payload_pretty().is_none());
    }

    #[test]
    fn test_message_preview_is_single_line() {
        let entry = LogEntry::new(1, 1, "line one\nline two");
        assert_eq!(entry.message_preview(12), "line one lin");
    }

    #[test]
    fn test_level_from_text() {
        assert_eq!(LogLevel::from_text(Some("WARN")), LogLevel::Warning);
        assert_eq!(LogLevel::from_text(Some("error")), LogLevel::Error);
        assert_eq!(LogLevel::from_text(None), LogLevel::Unknown);
    }

    #[test]
    fn test_filters_query_pairs_skip_blank_values() {
        let filters = LogFilters {
            correlation_id: Some("77".into()),
            resource_type: Some("   ".into()),
            status: Some(StatusFilter::Malformed),
            ..Default::default()
        };
        assert_eq!(
            filters.query_pairs(),
            vec![
                ("tf_req_id", "77".to_string()),
                ("status", "malformed".to_string())
            ]
        );
        assert!(LogFilters::default().is_empty());
        assert!(!filters.is_empty());
    }

    #[test]
    fn test_status_filter_cycle() {
        let mut s = None;
        let mut seen = Vec::new();
        for _ in 0..4 {
            s = StatusFilter::cycle(s);
            seen.push(s);
        }
        assert_eq!(
            seen,
            vec![
                Some(StatusFilter::Error),
                Some(StatusFilter::Ok),
                Some(StatusFilter::Malformed),
                None
            ]
        );
    }

    #[test]
    fn test_timeline_bar_wire_names() {
        let json = r#"{"key":"r1","start":"2024-03-01T10:00:00Z","end":"2024-03-01T10:00:01Z","count":3,"errors":1,"malformed":0}"#;
        let bar: TimelineBar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.error_count, 1);
        assert_eq!((bar.end - bar.start).num_milliseconds(), 1000);
    }

    #[test]
    fn test_group_summary_type_field() {
        let json = r#"{"key":"aws_s3_bucket:logs","display_name":"aws_s3_bucket : logs","type":"resource","count":4}"#;
        let g: GroupSummary = serde_json::from_str(json).unwrap();
        assert_eq!(g.kind, "resource");
        assert_eq!(g.count, 4);
    }
}
