//! Request descriptions and URL building for the backend endpoints

use std::path::PathBuf;

use url::Url;

use tflens_core::prelude::*;
use tflens_core::{LogFilters, PairingMode, RunId};

/// Parameters of one log-page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub run_id: RunId,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    pub pairing: PairingMode,
    pub include_pairs: bool,
    pub filters: LogFilters,
}

/// Export downloads offered by the backend. Bodies are saved, never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportRequest {
    /// Entries of the given groups as JSON lines
    ByKeys {
        run_id: RunId,
        pairing: PairingMode,
        keys: Vec<String>,
    },
    /// Every entry of the run as JSON lines
    Run { run_id: RunId },
    /// Timeline buckets as JSON
    TimelineJson { run_id: RunId, pairing: PairingMode },
    /// Timeline buckets as CSV
    TimelineCsv { run_id: RunId, pairing: PairingMode },
}

impl ExportRequest {
    pub fn run_id(&self) -> RunId {
        match self {
            ExportRequest::ByKeys { run_id, .. }
            | ExportRequest::Run { run_id }
            | ExportRequest::TimelineJson { run_id, .. }
            | ExportRequest::TimelineCsv { run_id, .. } => *run_id,
        }
    }

    /// File name the download is saved under
    pub fn file_name(&self) -> PathBuf {
        let name = match self {
            ExportRequest::ByKeys {
                run_id, pairing, ..
            } => format!("run-{run_id}-{}-selected.jsonl", pairing.as_wire()),
            ExportRequest::Run { run_id } => format!("run-{run_id}.jsonl"),
            ExportRequest::TimelineJson { run_id, pairing } => {
                format!("run-{run_id}-timeline-{}.json", pairing.as_wire())
            }
            ExportRequest::TimelineCsv { run_id, pairing } => {
                format!("run-{run_id}-timeline-{}.csv", pairing.as_wire())
            }
        };
        PathBuf::from(name)
    }

    /// Short description for status messages
    pub fn describe(&self) -> String {
        match self {
            ExportRequest::ByKeys { keys, .. } => format!("{} selected groups", keys.len()),
            ExportRequest::Run { .. } => "whole run".to_string(),
            ExportRequest::TimelineJson { .. } => "timeline (json)".to_string(),
            ExportRequest::TimelineCsv { .. } => "timeline (csv)".to_string(),
        }
    }
}

/// Builds endpoint URLs relative to the configured API root
#[derive(Debug, Clone)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:8000/api`
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url.trim())
            .map_err(|e| Error::invalid_url(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::invalid_url(format!("{base_url}: not a base URL")));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let joined = format!("{}/{}", self.base.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url.set_query(None);
        url
    }

    /// `GET logs/?run_id&page&page_size&include_pairs&pair_by&<filters>`
    pub fn logs(&self, query: &LogQuery) -> Url {
        let mut url = self.endpoint("logs/");
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("run_id", &query.run_id.to_string())
                .append_pair("page", &query.page.to_string())
                .append_pair("page_size", &query.page_size.to_string())
                .append_pair("include_pairs", bool_param(query.include_pairs))
                .append_pair("pair_by", query.pairing.as_wire());
            for (name, value) in query.filters.query_pairs() {
                pairs.append_pair(name, &value);
            }
        }
        url
    }

    /// `GET timeline/?run_id&by`
    pub fn timeline(&self, run_id: RunId, pairing: PairingMode) -> Url {
        let mut url = self.endpoint("timeline/");
        url.query_pairs_mut()
            .append_pair("run_id", &run_id.to_string())
            .append_pair("by", pairing.as_wire());
        url
    }

    /// `GET logs/groups?run_id&pair_by`
    pub fn groups(&self, run_id: RunId, pairing: PairingMode) -> Url {
        let mut url = self.endpoint("logs/groups");
        url.query_pairs_mut()
            .append_pair("run_id", &run_id.to_string())
            .append_pair("pair_by", pairing.as_wire());
        url
    }

    /// Download URL of an export
    pub fn export(&self, request: &ExportRequest) -> Url {
        match request {
            ExportRequest::ByKeys {
                run_id,
                pairing,
                keys,
            } => {
                let mut url = self.endpoint("export/jsonl_by_keys");
                url.query_pairs_mut()
                    .append_pair("run_id", &run_id.to_string())
                    .append_pair("pair_by", pairing.as_wire())
                    .append_pair("keys", &keys.join(","));
                url
            }
            ExportRequest::Run { run_id } => {
                let mut url = self.endpoint("export/jsonl");
                url.query_pairs_mut()
                    .append_pair("run_id", &run_id.to_string());
                url
            }
            ExportRequest::TimelineJson { run_id, pairing } => {
                self.timeline_export("export/timeline.json", *run_id, *pairing)
            }
            ExportRequest::TimelineCsv { run_id, pairing } => {
                self.timeline_export("export/timeline.csv", *run_id, *pairing)
            }
        }
    }

    fn timeline_export(&self, path: &str, run_id: RunId, pairing: PairingMode) -> Url {
        let mut url = self.endpoint(path);
        url.query_pairs_mut()
            .append_pair("run_id", &run_id.to_string())
            .append_pair("by", pairing.as_wire());
        url
    }
}

fn bool_param(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
