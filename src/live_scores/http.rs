use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::error::FetchError;
use super::provider::ScoreProvider;
use crate::models::{DateKey, ScoreSnapshot};

/// Path of the snapshot endpoint, relative to the API base URL.
pub const LIVE_SCORES_PATH: &str = "/api/live-scores";

/// Score provider backed by the blog backend's `/api/live-scores` endpoint.
pub struct HttpScoreProvider {
    http: Client,
    endpoint: Url,
}

impl HttpScoreProvider {
    pub fn new(api_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(HttpScoreProvider {
            http,
            endpoint: endpoint_url(api_url)?,
        })
    }

    /// Full request URL for one date.
    pub fn request_url(&self, date: DateKey) -> Url {
        let mut url = self.endpoint.clone();
        if let Some(d) = date.query_value() {
            url.query_pairs_mut().append_pair("date", &d);
        }
        url
    }
}

#[async_trait]
impl ScoreProvider for HttpScoreProvider {
    fn name(&self) -> &str {
        "live-scores-api"
    }

    async fn fetch_snapshot(&self, date: DateKey) -> Result<ScoreSnapshot, FetchError> {
        let url = self.request_url(date);
        debug!("Fetching score snapshot from {}", url);

        let resp = self.http.get(url).send().await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        let body = resp.bytes().await?;
        parse_snapshot(&body)
    }
}

fn endpoint_url(api_url: &str) -> anyhow::Result<Url> {
    let base = Url::parse(api_url.trim_end_matches('/'))
        .with_context(|| format!("Invalid API URL: {}", api_url))?;
    let path = format!("{}{}", base.path().trim_end_matches('/'), LIVE_SCORES_PATH);
    let mut url = base;
    url.set_path(&path);
    url.set_query(None);
    Ok(url)
}

/// Decode a snapshot body. Missing game blocks count as empty.
pub fn parse_snapshot(body: &[u8]) -> Result<ScoreSnapshot, FetchError> {
    Ok(serde_json::from_slice(body)?)
}
