//! Teamsheet core library
//!
//! Ties the alias store and the source extractors together behind a
//! single query facade:
//! - [`AliasCatalog`] / [`NameResolver`]: canonical team identity over
//!   the alias mapping, with last-good-snapshot fallback
//! - [`FeedCache`]: per-category TTL cache with request coalescing
//! - [`TeamFeed`]: the only surface the display layer talks to
//! - [`AppContext`]: explicit per-process wiring, no global state

pub mod cache;
pub mod context;
pub mod facade;
pub mod resolver;
pub mod severity;
pub mod telemetry;

pub use cache::{CacheEntry, FeedCache, DEFAULT_TTL_MINUTES};
pub use context::{AppContext, FeedConfig};
pub use facade::{InjurySummary, TeamFeed};
pub use resolver::{default_mapping, AliasCatalog, NameResolver, ReloadStatus, UnresolvedPolicy};
pub use severity::{classify, estimate_impact, risk_level, RiskLevel, Severity};

pub use teamsheet_scrape::{
    Harvest, HarvestOrigin, InjuryRecord, LineupRecord, RecordSource, ScrapeError, SourceFailure,
};
pub use teamsheet_store::{AliasMap, AliasStore, StoreError};

/// Teamsheet version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
