//! HTTP client for the measurement API.
//!
//! Requests are made with a blocking `ureq` agent on tokio's blocking pool,
//! so callers simply `.await` them. Nothing is retried; the save workflow
//! decides what to do on failure.

use std::time::Duration;

use async_trait::async_trait;
use roofkit_designer::{MeasurementTotals, Snapshot};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{SyncError, SyncResult};
use crate::messages::{
    RecomputeRequest, ReportReference, ReportRequest, VersionList, VersionSummary,
};
use crate::traits::{RecomputeService, ReportGenerator, SnapshotStore};

const USER_AGENT: &str = concat!("roofkit/", env!("CARGO_PKG_VERSION"));

/// Client bound to one measurement.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    measurement_id: String,
    agent: ureq::Agent,
}

/// Body returned when fetching a single version.
#[derive(Deserialize)]
struct VersionPayload {
    payload: Snapshot,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, measurement_id: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            measurement_id: measurement_id.into(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of `path` under this measurement.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/measurements/{}/{}",
            self.base_url,
            self.measurement_id,
            path.trim_start_matches('/')
        )
    }

    async fn get<T>(&self, path: &str) -> SyncResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let request = self.agent.get(&self.url(path));
        run_blocking(move || decode(request.call()?)).await
    }

    async fn post<T>(&self, path: &str, body: serde_json::Value) -> SyncResult<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let request = self
            .agent
            .post(&self.url(path))
            .set("Content-Type", "application/json");
        run_blocking(move || decode(request.send_json(body)?)).await
    }
}

fn decode<T: DeserializeOwned>(response: ureq::Response) -> SyncResult<T> {
    response
        .into_json::<T>()
        .map_err(|e| SyncError::InvalidResponse(e.to_string()))
}

async fn run_blocking<T, F>(f: F) -> SyncResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> SyncResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SyncError::Task(e.to_string()))?
}

#[async_trait]
impl SnapshotStore for HttpClient {
    async fn create_version(&self, snapshot: &Snapshot) -> SyncResult<VersionSummary> {
        let body = serde_json::to_value(snapshot.compacted())?;
        let summary: VersionSummary = self.post("versions", body).await?;
        tracing::info!(version = %summary.id, "Snapshot stored");
        Ok(summary)
    }

    async fn list_versions(&self) -> SyncResult<Vec<VersionSummary>> {
        let list: VersionList = self.get("versions").await?;
        Ok(list.versions)
    }

    async fn fetch_version(&self, id: &str) -> SyncResult<Snapshot> {
        let version: VersionPayload = self.get(&format!("versions/{}", id)).await?;
        Ok(version.payload)
    }
}

#[async_trait]
impl RecomputeService for HttpClient {
    async fn recompute(&self, request: &RecomputeRequest) -> SyncResult<MeasurementTotals> {
        self.post("recompute", serde_json::to_value(request)?).await
    }
}

#[async_trait]
impl ReportGenerator for HttpClient {
    async fn generate(&self, request: &ReportRequest) -> SyncResult<ReportReference> {
        self.post("report", serde_json::to_value(request)?).await
    }
}
