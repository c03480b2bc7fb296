//! Per-process wiring
//!
//! [`AppContext`] replaces the global singletons a quick integration
//! would reach for: it is constructed once per process from a
//! [`FeedConfig`] and handed to whatever request handlers the embedding
//! service runs. Nothing in this crate holds process-wide state.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;

use teamsheet_scrape::lineups::DEFAULT_BASE_URL;
use teamsheet_scrape::{HttpFetcher, InjuryScraper, LeagueSource, LineupScraper, PageFetcher};
use teamsheet_store::{AliasMap, HttpAliasStore, JsonFileStore, StoreResult};

use crate::cache::{FeedCache, DEFAULT_TTL_MINUTES};
use crate::facade::TeamFeed;
use crate::resolver::{default_mapping, AliasCatalog, ReloadStatus, UnresolvedPolicy};

/// Everything configurable about a teamsheet deployment.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL of the remote mapping endpoint; `None` runs purely off
    /// the local snapshot (or the shipped defaults)
    pub mapping_endpoint: Option<String>,
    /// Local alias snapshot file, consulted when the endpoint is down
    pub mapping_snapshot: Option<PathBuf>,
    /// League injury pages to scrape
    pub leagues: Vec<LeagueSource>,
    /// Base URL of the lineup preview site
    pub lineup_base_url: String,
    /// How long a fetched category stays fresh
    pub ttl: Duration,
    pub injury_policy: UnresolvedPolicy,
    pub lineup_policy: UnresolvedPolicy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        FeedConfig {
            mapping_endpoint: None,
            mapping_snapshot: None,
            leagues: LeagueSource::defaults(),
            lineup_base_url: DEFAULT_BASE_URL.to_string(),
            ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
            injury_policy: UnresolvedPolicy::Discard,
            lineup_policy: UnresolvedPolicy::EchoQuery,
        }
    }
}

/// One process's fully wired teamsheet instance.
pub struct AppContext {
    catalog: Arc<AliasCatalog>,
    feed: TeamFeed,
}

impl AppContext {
    /// Wire up stores, scrapers, and caches, then attempt an initial
    /// alias load. Initialization never fails: with every store down the
    /// catalog keeps the shipped default mapping.
    pub async fn initialize(config: FeedConfig) -> Self {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new());
        Self::initialize_with_fetcher(config, fetcher).await
    }

    /// Same wiring with an injected page fetcher (tests, offline replay).
    pub async fn initialize_with_fetcher(config: FeedConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        let snapshot_store = config
            .mapping_snapshot
            .as_ref()
            .map(|path| Arc::new(JsonFileStore::new(path)));

        let catalog = match (&config.mapping_endpoint, snapshot_store) {
            (Some(endpoint), snapshot) => {
                let mut catalog = AliasCatalog::seeded(
                    Arc::new(HttpAliasStore::new(endpoint.clone())),
                    default_mapping(),
                );
                if let Some(snapshot) = snapshot {
                    catalog = catalog.with_fallback(snapshot);
                }
                catalog
            }
            (None, Some(snapshot)) => AliasCatalog::seeded(snapshot, default_mapping()),
            (None, None) => {
                // No store configured at all; run on the shipped defaults.
                AliasCatalog::seeded(
                    Arc::new(JsonFileStore::new("team-mappings.json")),
                    default_mapping(),
                )
            }
        };
        catalog.reload().await;
        let catalog = Arc::new(catalog);

        let injuries = FeedCache::new(
            "injuries",
            Arc::new(InjuryScraper::new(Arc::clone(&fetcher), config.leagues)),
            config.ttl,
        );
        let lineups = FeedCache::new(
            "lineups",
            Arc::new(LineupScraper::new(fetcher, config.lineup_base_url)),
            config.ttl,
        );

        let feed = TeamFeed::new(
            Arc::clone(&catalog),
            injuries,
            lineups,
            config.injury_policy,
            config.lineup_policy,
        );

        AppContext { catalog, feed }
    }

    /// The query surface for request handlers.
    pub fn feed(&self) -> &TeamFeed {
        &self.feed
    }

    /// Re-read the alias mapping from the configured stores.
    pub async fn reload_mappings(&self) -> ReloadStatus {
        self.catalog.reload().await
    }

    /// Replace the alias mapping in the primary store and locally.
    pub async fn replace_mappings(&self, mapping: &AliasMap) -> StoreResult<()> {
        self.catalog.replace(mapping).await
    }

    /// Current alias mapping snapshot.
    pub fn mappings(&self) -> Arc<AliasMap> {
        self.catalog.snapshot()
    }
}
