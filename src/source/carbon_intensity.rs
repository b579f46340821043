//! Client for the GB Carbon Intensity generation-mix endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{IntervalSource, SourceError};
use crate::config::UpstreamConfig;
use crate::horizon::TimeRange;
use crate::model::GenerationInterval;
use crate::timestamp::format_request_timestamp;

/// `GET {base_url}/generation/{from}/{to}` response body.
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    data: Option<Vec<GenerationInterval>>,
}

/// Carbon Intensity API client.
#[derive(Debug, Clone)]
pub struct CarbonIntensityClient {
    base_url: String,
    client: Client,
}

impl CarbonIntensityClient {
    /// Creates a client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { base_url, client })
    }

    /// Creates a client from the `[upstream]` config section.
    ///
    /// # Errors
    ///
    /// Returns `SourceError::Http` if the HTTP client cannot be built.
    pub fn from_config(cfg: &UpstreamConfig) -> Result<Self, SourceError> {
        Self::new(cfg.base_url.clone(), Duration::from_secs(cfg.timeout_secs))
    }

    fn generation_url(&self, range: &TimeRange) -> String {
        format!(
            "{}/generation/{}/{}",
            self.base_url,
            format_request_timestamp(&range.from),
            format_request_timestamp(&range.to)
        )
    }
}

#[async_trait]
impl IntervalSource for CarbonIntensityClient {
    async fn fetch_intervals(&self, range: &TimeRange) -> Result<Vec<GenerationInterval>, SourceError> {
        let url = self.generation_url(range);
        debug!(%url, "Fetching generation mix");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %url, "Generation feed returned an error status");
            return Err(SourceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let intervals = response
            .json::<GenerationResponse>()
            .await?
            .data
            .ok_or(SourceError::EmptyResponse)?;
        debug!(intervals = intervals.len(), "Fetched generation mix");
        Ok(intervals)
    }
}
