//! Backend read contracts and the reqwest-based HTTP client

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use url::Url;

use tflens_core::prelude::*;
use tflens_core::{GroupSummary, LogsPage, PairingMode, RunId, TimelineBar};

use crate::query::{Endpoints, ExportRequest, LogQuery};
use crate::wire::{GroupsResponse, TimelineResponse};

/// Maximum number of body bytes echoed into an error message
const ERROR_BODY_LIMIT: usize = 200;

/// Read and export operations the viewer needs from the backend.
///
/// Each call is an independent request; the caller decides what to do with
/// results that arrive after the user moved on.
#[trait_variant::make(LogBackend: Send)]
pub trait LocalLogBackend {
    /// Fetch one page of entries
    async fn fetch_logs(&self, query: &LogQuery) -> Result<LogsPage>;

    /// Fetch aggregated timeline buckets for a pairing mode
    async fn fetch_timeline(&self, run_id: RunId, pairing: PairingMode)
        -> Result<Vec<TimelineBar>>;

    /// List every group of the run, for selection dialogs
    async fn fetch_groups(&self, run_id: RunId, pairing: PairingMode)
        -> Result<Vec<GroupSummary>>;

    /// Save an export body to `dest` and return the number of bytes written
    async fn download(&self, request: &ExportRequest, dest: &Path) -> Result<u64>;
}

/// HTTP implementation backed by a shared [`reqwest::Client`]
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    endpoints: Endpoints,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let endpoints = Endpoints::new(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(e.to_string()))?;
        debug!("Backend API root: {}", endpoints.base());
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::http(e.to_string()))?;

        if !status.is_success() {
            warn!("GET {} returned {}", url.path(), status);
            return Err(Error::backend_status(status.as_u16(), truncate(&text)));
        }

        serde_json::from_str(&text)
            .map_err(|e| Error::decode(format!("{}: {e} - {}", url.path(), truncate(&text))))
    }
}

impl LogBackend for HttpBackend {
    async fn fetch_logs(&self, query: &LogQuery) -> Result<LogsPage> {
        let page: LogsPage = self.get_json(self.endpoints.logs(query)).await?;
        debug!(
            "run {} page {}: {} items ({} extra) of {}",
            query.run_id,
            query.page,
            page.items.len(),
            page.extras,
            page.total
        );
        Ok(page)
    }

    async fn fetch_timeline(
        &self,
        run_id: RunId,
        pairing: PairingMode,
    ) -> Result<Vec<TimelineBar>> {
        let resp: TimelineResponse = self
            .get_json(self.endpoints.timeline(run_id, pairing))
            .await?;
        Ok(resp.items)
    }

    async fn fetch_groups(
        &self,
        run_id: RunId,
        pairing: PairingMode,
    ) -> Result<Vec<GroupSummary>> {
        let resp: GroupsResponse = self
            .get_json(self.endpoints.groups(run_id, pairing))
            .await?;
        Ok(resp.into_groups(pairing))
    }

    async fn download(&self, request: &ExportRequest, dest: &Path) -> Result<u64> {
        let url = self.endpoints.export(request);
        info!("Export {} -> {}", url, dest.display());

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::backend_status(status.as_u16(), truncate(&body)));
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(dest).await?;
        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::http(e.to_string()))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        Ok(written)
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= ERROR_BODY_LIMIT {
        text.to_string()
    } else {
        let head: String = text.chars().take(ERROR_BODY_LIMIT).collect();
        format!("{head}...")
    }
}
