use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{error::FetchError, feed::FeedSource, xml::FeedDocument};

/// Default lifetime of a fetched document.
pub const DEFAULT_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub document: Arc<FeedDocument>,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.fetched_at < ttl
    }
}

/// Single-slot cache in front of a [`FeedSource`].
///
/// Refresh is lazy: the first call after expiry fetches. The slot stays
/// locked for the whole check-fetch-store sequence, so concurrent callers
/// wait for one fetch instead of starting their own.
#[derive(Debug)]
pub struct FeedCache {
    source: Box<dyn FeedSource>,
    ttl: Duration,
    slot: Mutex<Option<CacheEntry>>,
}

impl FeedCache {
    pub fn new(source: Box<dyn FeedSource>, ttl: Duration) -> Self {
        Self { source, ttl, slot: Mutex::new(None) }
    }

    pub async fn get_document(&self) -> Result<Arc<FeedDocument>, FetchError> {
        self.get_document_at(Utc::now()).await
    }

    /// Like [`get_document`](Self::get_document) with an explicit clock.
    pub async fn get_document_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Arc<FeedDocument>, FetchError> {
        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot.as_ref().filter(|e| e.is_fresh(now, self.ttl)) {
            debug!(fetched_at = %entry.fetched_at, "feed cache hit");
            return Ok(Arc::clone(&entry.document));
        }

        info!(expired = slot.is_some(), "refreshing feed");
        // A failed fetch returns before the slot is touched.
        let document = Arc::new(self.source.fetch().await?);
        *slot = Some(CacheEntry { document: Arc::clone(&document), fetched_at: now });

        Ok(document)
    }

    /// Current entry, fresh or not.
    pub async fn entry(&self) -> Option<CacheEntry> {
        self.slot.lock().await.clone()
    }

    pub async fn invalidate(&self) {
        self.slot.lock().await.take();
    }
}
