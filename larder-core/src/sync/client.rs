//! HTTP clients for the Larder sync service.
//!
//! Records travel as JSON:
//! - `POST {server}/sync/{table}` with `{user, records}` answers `{results}`
//! - `GET {server}/sync/changes?user=..&since=..` answers `{records}`
//!
//! Image binaries travel raw at `{server}/images/{logical_id}`.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::TransportError;
use super::{ImageTransfer, PushOutcome, RemoteSyncApi};
use crate::models::Table;
use crate::wire::WireRecord;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    user: &'a str,
    records: Vec<WireRecord>,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    results: Vec<PushOutcome>,
}

#[derive(Debug, Deserialize)]
struct PullResponse {
    #[serde(default)]
    records: Vec<WireRecord>,
}

/// Returns true if the server answers its health endpoint.
pub async fn check_server(server_url: &str) -> bool {
    let client = match reqwest::Client::builder().timeout(HEALTH_TIMEOUT).build() {
        Ok(client) => client,
        Err(_) => return false,
    };
    let url = format!("{}/health", base_url(server_url));
    matches!(client.get(&url).send().await, Ok(r) if r.status().is_success())
}

/// Normalizes a configured server URL to an http(s) base without a trailing slash.
fn base_url(server_url: &str) -> String {
    let trimmed = server_url.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

async fn error_for_status(response: reqwest::Response) -> TransportError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    TransportError::Status { status, message }
}

/// Record push/pull over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSyncApi {
    server_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpSyncApi {
    pub fn new(server_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            server_url: base_url(&server_url.into()),
            api_key: api_key.into(),
            client: build_client(),
        }
    }

    /// Returns the server URL.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn push_url(&self, table: Table) -> String {
        format!("{}/sync/{}", self.server_url, table.name())
    }

    fn changes_url(&self) -> String {
        format!("{}/sync/changes", self.server_url)
    }
}

#[async_trait]
impl RemoteSyncApi for HttpSyncApi {
    async fn push(
        &self,
        user: &str,
        table: Table,
        records: Vec<WireRecord>,
    ) -> Result<Vec<PushOutcome>, TransportError> {
        let response = self
            .client
            .post(self.push_url(table))
            .bearer_auth(&self.api_key)
            .json(&PushRequest { user, records })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let body: PushResponse = response.json().await?;
        Ok(body.results)
    }

    async fn pull(
        &self,
        user: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<WireRecord>, TransportError> {
        let since = since.to_rfc3339_opts(SecondsFormat::Micros, true);
        let response = self
            .client
            .get(self.changes_url())
            .bearer_auth(&self.api_key)
            .query(&[("user", user), ("since", since.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }

        let body: PullResponse = response.json().await?;
        Ok(body.records)
    }
}

/// Image binary transfer over HTTP.
#[derive(Debug, Clone)]
pub struct HttpImageTransfer {
    server_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpImageTransfer {
    pub fn new(server_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            server_url: base_url(&server_url.into()),
            api_key: api_key.into(),
            client: build_client(),
        }
    }

    fn image_url(&self, logical_id: &str) -> String {
        format!("{}/images/{}", self.server_url, logical_id)
    }
}

#[async_trait]
impl ImageTransfer for HttpImageTransfer {
    async fn upload(&self, logical_id: &str, bytes: Vec<u8>) -> Result<(), TransportError> {
        let response = self
            .client
            .put(self.image_url(logical_id))
            .bearer_auth(&self.api_key)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_for_status(response).await);
        }
        Ok(())
    }

    async fn retrieve(&self, logical_id: &str) -> Result<Option<Vec<u8>>, TransportError> {
        let response = self
            .client
            .get(self.image_url(logical_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.bytes().await?.to_vec())),
            _ => Err(error_for_status(response).await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_with_http() {
        assert_eq!(base_url("http://localhost:8080"), "http://localhost:8080");
    }

    #[test]
    fn test_base_url_with_https_and_trailing_slash() {
        assert_eq!(
            base_url("https://sync.example.com/"),
            "https://sync.example.com"
        );
    }

    #[test]
    fn test_base_url_bare_host() {
        assert_eq!(base_url("localhost:8080"), "http://localhost:8080");
    }

    #[test]
    fn test_push_url_per_table() {
        let api = HttpSyncApi::new("localhost:8080", "key");
        assert_eq!(
            api.push_url(Table::RecipeImages),
            "http://localhost:8080/sync/recipe_images"
        );
        assert_eq!(api.changes_url(), "http://localhost:8080/sync/changes");
    }

    #[test]
    fn test_image_url() {
        let transfer = HttpImageTransfer::new("https://sync.example.com", "key");
        assert_eq!(
            transfer.image_url("abc-123"),
            "https://sync.example.com/images/abc-123"
        );
    }

    #[test]
    fn test_pull_response_tolerates_missing_records() {
        let body: PullResponse = serde_json::from_str("{}").unwrap();
        assert!(body.records.is_empty());
    }
}
