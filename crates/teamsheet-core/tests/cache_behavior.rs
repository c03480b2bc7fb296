//! Aggregation cache properties.
//!
//! Verifies the per-category state machine: fresh entries served without
//! fetching, staleness triggering exactly one coalesced fetch under
//! concurrency, and wholesale entry replacement.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Duration;
use teamsheet_core::{FeedCache, Harvest, RecordSource, SourceFailure};

/// Record source probe that counts how many collection passes ran.
struct CountingSource {
    passes: AtomicUsize,
    delay: StdDuration,
    fail: bool,
}

impl CountingSource {
    fn new(delay: StdDuration) -> Arc<Self> {
        Arc::new(CountingSource {
            passes: AtomicUsize::new(0),
            delay,
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(CountingSource {
            passes: AtomicUsize::new(0),
            delay: StdDuration::ZERO,
            fail: true,
        })
    }

    fn passes(&self) -> usize {
        self.passes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource<usize> for CountingSource {
    async fn collect(&self) -> Harvest<usize> {
        let pass = self.passes.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            Harvest::live(
                Vec::new(),
                vec![SourceFailure {
                    source: "probe".to_string(),
                    reason: "simulated outage".to_string(),
                }],
            )
        } else {
            Harvest::live(vec![pass], Vec::new())
        }
    }
}

#[tokio::test]
async fn test_concurrent_gets_on_empty_cache_share_one_fetch() {
    let source = CountingSource::new(StdDuration::from_millis(50));
    let cache = FeedCache::new("probe", source.clone(), Duration::minutes(15));

    let (a, b) = tokio::join!(cache.get(false), cache.get(false));

    assert_eq!(source.passes(), 1);
    // Both callers received the result of the same pass.
    assert_eq!(a.records, b.records);
}

#[tokio::test]
async fn test_fresh_entry_is_served_without_fetching() {
    let source = CountingSource::new(StdDuration::ZERO);
    let cache = FeedCache::new("probe", source.clone(), Duration::minutes(15));

    let first = cache.get(false).await;
    let second = cache.get(false).await;

    assert_eq!(source.passes(), 1);
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn test_stale_entry_triggers_a_new_fetch() {
    // A zero TTL makes every entry stale the moment it lands.
    let source = CountingSource::new(StdDuration::ZERO);
    let cache = FeedCache::new("probe", source.clone(), Duration::zero());

    cache.get(false).await;
    cache.get(false).await;

    assert_eq!(source.passes(), 2);
}

#[tokio::test]
async fn test_concurrent_gets_on_stale_cache_share_one_fetch() {
    let source = CountingSource::new(StdDuration::from_millis(50));
    let cache = FeedCache::new("probe", source.clone(), Duration::zero());

    cache.get(false).await;
    assert_eq!(source.passes(), 1);

    // Entry is stale; two logically concurrent callers must see exactly
    // one further fetch cycle.
    let (a, b) = tokio::join!(cache.get(false), cache.get(false));
    assert_eq!(source.passes(), 2);
    assert_eq!(a.records, b.records);
}

#[tokio::test]
async fn test_force_refresh_bypasses_a_fresh_entry() {
    let source = CountingSource::new(StdDuration::ZERO);
    let cache = FeedCache::new("probe", source.clone(), Duration::minutes(15));

    cache.get(false).await;
    let refreshed = cache.get(true).await;

    assert_eq!(source.passes(), 2);
    assert_eq!(refreshed.records, vec![2]);
}

#[tokio::test]
async fn test_entries_are_replaced_wholesale() {
    let source = CountingSource::new(StdDuration::ZERO);
    let cache = FeedCache::new("probe", source.clone(), Duration::minutes(15));

    let first = cache.get(false).await;
    let second = cache.get(true).await;

    // The old entry is untouched; a whole new entry was swapped in.
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.records, vec![1]);
    assert_eq!(second.records, vec![2]);
}

#[tokio::test]
async fn test_all_sources_failing_surfaces_degraded_not_error() {
    let source = CountingSource::failing();
    let cache = FeedCache::new("probe", source, Duration::minutes(15));

    let entry = cache.get(false).await;
    assert!(entry.records.is_empty());
    assert!(entry.is_degraded());
    assert_eq!(entry.failures.len(), 1);
}

#[tokio::test]
async fn test_current_does_not_fetch() {
    let source = CountingSource::new(StdDuration::ZERO);
    let cache = FeedCache::new("probe", source.clone(), Duration::minutes(15));

    assert!(cache.current().await.is_none());
    assert_eq!(source.passes(), 0);

    cache.get(false).await;
    assert!(cache.current().await.is_some());
    assert_eq!(source.passes(), 1);
}
