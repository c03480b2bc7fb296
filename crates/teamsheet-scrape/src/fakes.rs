//! In-memory fake for the page fetcher (testing only)
//!
//! Serves canned documents keyed by URL, counts every fetch (the probe for
//! coalescing and isolation properties), and can simulate slow or failing
//! sources.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ScrapeError;
use crate::fetch::PageFetcher;

enum CannedResponse {
    Page(String),
    Failure(String),
}

/// In-memory page fetcher backed by a URL → document map.
#[derive(Default)]
pub struct MemoryFetcher {
    responses: Mutex<HashMap<String, CannedResponse>>,
    fetch_count: AtomicUsize,
    delay: Mutex<Option<Duration>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    pub fn insert_page(&self, url: impl Into<String>, html: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.into(), CannedResponse::Page(html.into()));
    }

    /// Make fetches of `url` fail with a network error.
    pub fn fail_page(&self, url: impl Into<String>, reason: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.into(), CannedResponse::Failure(reason.into()));
    }

    /// Delay every fetch, to widen race windows in coalescing tests.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Total fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        // Cache-busting query strings vary per request; match without them.
        let bare = url.split('?').next().unwrap_or(url);
        let responses = self.responses.lock().unwrap();
        match responses.get(url).or_else(|| responses.get(bare)) {
            Some(CannedResponse::Page(html)) => Ok(html.clone()),
            Some(CannedResponse::Failure(reason)) => Err(ScrapeError::Network(reason.clone())),
            None => Err(ScrapeError::Http {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}
