//! Per-category TTL cache with request coalescing
//!
//! One [`FeedCache`] instance fronts one category's extractor. A fresh
//! entry is served without touching the network; a stale or missing entry
//! triggers a fetch whose future is registered under the category, so
//! concurrent callers await the same in-flight fetch instead of starting
//! their own. The entry is replaced wholesale by a single `Arc` swap, so
//! readers never observe a half-updated entry.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use teamsheet_scrape::{Harvest, HarvestOrigin, RecordSource, SourceFailure};

/// Default time a fetched category stays fresh.
pub const DEFAULT_TTL_MINUTES: i64 = 15;

/// One category's cached extraction result.
#[derive(Debug, Clone)]
pub struct CacheEntry<R> {
    pub records: Vec<R>,
    /// Per-source failure reasons from the pass that built this entry
    pub failures: Vec<SourceFailure>,
    pub origin: HarvestOrigin,
    pub fetched_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl<R> CacheEntry<R> {
    pub fn from_harvest(harvest: Harvest<R>, ttl: Duration, fetched_at: DateTime<Utc>) -> Self {
        CacheEntry {
            records: harvest.records,
            failures: harvest.failures,
            origin: harvest.origin,
            fetched_at,
            ttl,
        }
    }

    /// Stale exactly at the TTL boundary: `age >= ttl`.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) >= self.ttl
    }

    /// True when this entry carries no usable live data: every source
    /// failed, or only placeholder records remain.
    pub fn is_degraded(&self) -> bool {
        self.origin == HarvestOrigin::Fallback
            || (self.records.is_empty() && !self.failures.is_empty())
    }
}

type SharedFetch<R> = Shared<BoxFuture<'static, Arc<CacheEntry<R>>>>;

struct CacheState<R> {
    entry: Option<Arc<CacheEntry<R>>>,
    inflight: Option<SharedFetch<R>>,
}

struct CacheInner<R> {
    category: &'static str,
    source: Arc<dyn RecordSource<R>>,
    ttl: Duration,
    state: Mutex<CacheState<R>>,
}

/// TTL cache over one category's [`RecordSource`].
pub struct FeedCache<R> {
    inner: Arc<CacheInner<R>>,
}

impl<R> Clone for FeedCache<R> {
    fn clone(&self) -> Self {
        FeedCache {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: Send + Sync + 'static> FeedCache<R> {
    pub fn new(category: &'static str, source: Arc<dyn RecordSource<R>>, ttl: Duration) -> Self {
        FeedCache {
            inner: Arc::new(CacheInner {
                category,
                source,
                ttl,
                state: Mutex::new(CacheState {
                    entry: None,
                    inflight: None,
                }),
            }),
        }
    }

    /// Return the current entry, fetching if it is missing or stale.
    ///
    /// At most one fetch is in flight per category: callers arriving
    /// during a fetch await its result rather than starting another.
    /// `force_refresh` skips the freshness check but still coalesces.
    pub async fn get(&self, force_refresh: bool) -> Arc<CacheEntry<R>> {
        let fetch = {
            let mut state = self.inner.state.lock().await;

            if !force_refresh {
                if let Some(entry) = &state.entry {
                    if !entry.is_stale(Utc::now()) {
                        debug!(event = "cache.hit", category = self.inner.category);
                        return Arc::clone(entry);
                    }
                }
            }

            if let Some(inflight) = &state.inflight {
                debug!(event = "cache.coalesced", category = self.inner.category);
                inflight.clone()
            } else {
                let inner = Arc::clone(&self.inner);
                let fetch = async move {
                    info!(event = "cache.fetch", category = inner.category);
                    let harvest = inner.source.collect().await;
                    let entry = Arc::new(CacheEntry::from_harvest(harvest, inner.ttl, Utc::now()));
                    info!(
                        event = "cache.refreshed",
                        category = inner.category,
                        records = entry.records.len(),
                        degraded = entry.is_degraded(),
                    );
                    let mut state = inner.state.lock().await;
                    state.entry = Some(Arc::clone(&entry));
                    state.inflight = None;
                    entry
                }
                .boxed()
                .shared();
                state.inflight = Some(fetch.clone());
                fetch
            }
        };

        fetch.await
    }

    /// The current entry, if any, without triggering a fetch.
    pub async fn current(&self) -> Option<Arc<CacheEntry<R>>> {
        self.inner.state.lock().await.entry.clone()
    }
}
