//! End-to-end facade queries over canned documents.
//!
//! Wires a full `AppContext` with the in-memory page fetcher and a local
//! mapping snapshot, then exercises the display-layer surface: injury
//! lookups, lineup lookups, severity summaries, and the degraded path
//! when every source is down.

use std::sync::Arc;

use teamsheet_core::{AppContext, FeedConfig, HarvestOrigin, RiskLevel};
use teamsheet_scrape::fakes::MemoryFetcher;
use teamsheet_scrape::LeagueSource;
use teamsheet_store::AliasMap;

const LEAGUE_PAGE: &str = r#"
    <html><body>
    <h3>Arsenal</h3>
    <div class="inj-row"><div>
        Bukayo Saka
        Forward
        10
        3
        2
        Torn ACL, out for season
        April 2026
    </div></div>
    <div class="inj-row"><div>
        Declan Rice
        Midfielder
        12
        1
        0
        Knock, assessed daily
        Next match
    </div></div>
    <h3>Chelsea</h3>
    <div class="inj-row"><div>
        Reece James
        Defender
        8
        0
        1
        Hamstring strain
        Late November
    </div></div>
    </body></html>
"#;

const INDEX_PAGE: &str = r#"
    <a data-title="Preview: Arsenal vs Chelsea" href="/p1.html">preview</a>
"#;

const PREVIEW_PAGE: &str = r#"
    <article>
    <strong>Arsenal possible starting lineup:</strong>
    <p>Raya; White, Saliba, Gabriel, Timber; Rice, Odegaard; Saka, Havertz, Martinelli; Jesus</p>
    </article>
"#;

fn test_mapping() -> AliasMap {
    let mut map = AliasMap::new();
    map.insert(
        "Arsenal".to_string(),
        vec!["AFC".to_string(), "Gunners".to_string()],
    );
    map.insert(
        "Chelsea".to_string(),
        vec!["CFC".to_string(), "Blues".to_string()],
    );
    map
}

async fn wired_context(fetcher: Arc<MemoryFetcher>) -> AppContext {
    let dir = tempfile::tempdir().unwrap();
    let snapshot = dir.path().join("team-mappings.json");
    std::fs::write(&snapshot, serde_json::to_string(&test_mapping()).unwrap()).unwrap();

    let config = FeedConfig {
        mapping_snapshot: Some(snapshot),
        leagues: vec![LeagueSource::new(
            "england-premier-league",
            "https://inj.test/epl",
        )],
        lineup_base_url: "https://mole.test".to_string(),
        ..FeedConfig::default()
    };
    AppContext::initialize_with_fetcher(config, fetcher).await
}

fn fetcher_with_pages() -> Arc<MemoryFetcher> {
    let fetcher = Arc::new(MemoryFetcher::new());
    fetcher.insert_page("https://inj.test/epl", LEAGUE_PAGE);
    fetcher.insert_page("https://mole.test/index_rhs.html", INDEX_PAGE);
    fetcher.insert_page("https://mole.test/p1.html", PREVIEW_PAGE);
    fetcher
}

#[tokio::test]
async fn test_injuries_by_canonical_name() {
    let ctx = wired_context(fetcher_with_pages()).await;

    let records = ctx.feed().injuries("Arsenal").await;
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.team == "Arsenal"));
}

#[tokio::test]
async fn test_injuries_by_alias_goes_through_resolution() {
    let ctx = wired_context(fetcher_with_pages()).await;

    // "gunners" shares no substring with "arsenal"; only the canonical
    // resolution can connect them.
    let records = ctx.feed().injuries("Gunners").await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].player_name, "Bukayo Saka");
}

#[tokio::test]
async fn test_injuries_for_unknown_or_empty_team_are_empty() {
    let ctx = wired_context(fetcher_with_pages()).await;

    assert!(ctx.feed().injuries("").await.is_empty());
    assert!(ctx.feed().injuries("Real Sociedad").await.is_empty());
}

#[tokio::test]
async fn test_lineup_by_alias() {
    let ctx = wired_context(fetcher_with_pages()).await;

    let lineup = ctx.feed().lineup("AFC").await.expect("arsenal lineup");
    assert_eq!(lineup.team, "Arsenal");
    assert_eq!(lineup.players().len(), 11);
    assert_eq!(lineup.source_url, "https://mole.test/p1.html");
}

#[tokio::test]
async fn test_lineup_for_unknown_team_is_none() {
    let ctx = wired_context(fetcher_with_pages()).await;
    assert!(ctx.feed().lineup("Unknown FC").await.is_none());
}

#[tokio::test]
async fn test_summary_buckets_and_risk() {
    let ctx = wired_context(fetcher_with_pages()).await;

    let summary = ctx.feed().summarize("Arsenal").await;
    assert_eq!(summary.total, 2);
    assert_eq!(summary.severe, 1);
    assert_eq!(summary.doubtful, 1);
    assert_eq!(summary.moderate, 0);
    // severe forward (4.0 * 1.4 * 2.5) + doubtful midfielder
    // (0.7 * 1.2 * 2.5) = 16.1 → high risk
    assert_eq!(summary.risk, RiskLevel::High);
}

#[tokio::test]
async fn test_queries_reuse_the_cached_fetch() {
    let fetcher = fetcher_with_pages();
    let ctx = wired_context(fetcher.clone()).await;

    ctx.feed().injuries("Arsenal").await;
    ctx.feed().injuries("Chelsea").await;
    ctx.feed().summarize("Arsenal").await;

    // One league page fetch serves all three queries.
    assert_eq!(fetcher.fetch_count(), 1);
}

#[tokio::test]
async fn test_refresh_all_forces_both_categories() {
    let fetcher = fetcher_with_pages();
    let ctx = wired_context(fetcher.clone()).await;

    ctx.feed().injuries("Arsenal").await;
    ctx.feed().lineup("Arsenal").await;
    let after_first = fetcher.fetch_count();
    assert_eq!(after_first, 3); // league page + index + preview

    ctx.feed().refresh_all().await;
    assert_eq!(fetcher.fetch_count(), after_first + 3);
}

#[tokio::test]
async fn test_total_outage_serves_placeholder_not_error() {
    // No pages at all: every fetch 404s.
    let fetcher = Arc::new(MemoryFetcher::new());
    let ctx = wired_context(fetcher).await;

    let records = ctx.feed().injuries("Manchester United").await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].player_name, "Sample Player");

    let entry = ctx.feed().injuries_entry().await.expect("entry present");
    assert_eq!(entry.origin, HarvestOrigin::Fallback);
    assert!(entry.is_degraded());

    assert!(ctx.feed().lineup("Arsenal").await.is_none());
    let entry = ctx.feed().lineups_entry().await.expect("entry present");
    assert!(entry.is_degraded());
}
