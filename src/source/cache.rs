//! Per-range memoization of an interval source.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::{debug, trace};

use super::{IntervalSource, SourceError};
use crate::horizon::TimeRange;
use crate::model::GenerationInterval;

struct CacheEntry {
    created: Instant,
    cell: Arc<OnceCell<Arc<Vec<GenerationInterval>>>>,
}

/// Memoizes another source's results per exact `(from, to)` range.
///
/// Concurrent requests for the same range share one upstream fetch. Failures
/// are not cached, so the next request for that range fetches again. Entries
/// older than the TTL are purged whenever the cache is consulted.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    entries: Mutex<HashMap<TimeRange, CacheEntry>>,
}

impl<S: IntervalSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of ranges currently held, fetched or in flight.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell_for(&self, range: &TimeRange) -> Arc<OnceCell<Arc<Vec<GenerationInterval>>>> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| now.duration_since(entry.created) < self.ttl);
        let entry = entries.entry(*range).or_insert_with(|| {
            trace!(from = %range.from, to = %range.to, "New cache entry");
            CacheEntry {
                created: now,
                cell: Arc::new(OnceCell::new()),
            }
        });
        Arc::clone(&entry.cell)
    }
}

#[async_trait]
impl<S: IntervalSource> IntervalSource for CachedSource<S> {
    async fn fetch_intervals(&self, range: &TimeRange) -> Result<Vec<GenerationInterval>, SourceError> {
        let cell = self.cell_for(range);
        if cell.initialized() {
            debug!(from = %range.from, to = %range.to, "Serving intervals from cache");
        }
        let intervals = cell
            .get_or_try_init(|| async { self.inner.fetch_intervals(range).await.map(Arc::new) })
            .await?;
        Ok(Vec::clone(intervals))
    }
}
