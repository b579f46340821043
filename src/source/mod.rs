//! Interval sources: where generation-mix data comes from.
//!
//! The service depends only on [`IntervalSource`]; the live feed client and
//! the memoizing wrapper both implement it, and tests substitute fixed lists.

mod cache;
mod carbon_intensity;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use cache::CachedSource;
pub use carbon_intensity::CarbonIntensityClient;

use crate::horizon::TimeRange;
use crate::model::GenerationInterval;

/// Failure to obtain intervals from a source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed returned error status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("feed returned no data")]
    EmptyResponse,
}

/// Capability to fetch generation intervals covering a time range.
#[async_trait]
pub trait IntervalSource: Send + Sync {
    /// Fetches intervals covering at least `range`, in chronological order.
    async fn fetch_intervals(&self, range: &TimeRange) -> Result<Vec<GenerationInterval>, SourceError>;
}

#[async_trait]
impl<T: IntervalSource + ?Sized> IntervalSource for Arc<T> {
    async fn fetch_intervals(&self, range: &TimeRange) -> Result<Vec<GenerationInterval>, SourceError> {
        (**self).fetch_intervals(range).await
    }
}
