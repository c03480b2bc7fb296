//! Query facade
//!
//! [`TeamFeed`] is the only surface the display layer talks to. Every
//! method resolves the queried team name, scans the relevant cached
//! category, and returns data (possibly empty or degraded), never an
//! error. Rendering is the display layer's problem.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use teamsheet_scrape::{InjuryRecord, LineupRecord};

use crate::cache::{CacheEntry, FeedCache};
use crate::resolver::{AliasCatalog, NameResolver, UnresolvedPolicy};
use crate::severity::{classify, estimate_impact, risk_level, RiskLevel, Severity};

/// Severity breakdown for one team's injury list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjurySummary {
    pub total: usize,
    pub severe: usize,
    pub moderate: usize,
    pub minor: usize,
    pub doubtful: usize,
    /// Cosmetic squad-impact estimate, 0–30
    pub impact: f32,
    pub risk: RiskLevel,
}

impl InjurySummary {
    /// Summarize an already-selected record list.
    pub fn from_records(records: &[InjuryRecord]) -> Self {
        let mut summary = InjurySummary {
            total: records.len(),
            severe: 0,
            moderate: 0,
            minor: 0,
            doubtful: 0,
            impact: estimate_impact(records),
            risk: RiskLevel::Low,
        };
        for record in records {
            match classify(&record.info) {
                Severity::Severe => summary.severe += 1,
                Severity::Moderate => summary.moderate += 1,
                Severity::Minor => summary.minor += 1,
                Severity::Doubtful => summary.doubtful += 1,
            }
        }
        summary.risk = risk_level(summary.impact);
        summary
    }
}

/// The query surface consumed by the display layer.
pub struct TeamFeed {
    injuries: FeedCache<InjuryRecord>,
    lineups: FeedCache<LineupRecord>,
    injury_resolver: NameResolver,
    lineup_resolver: NameResolver,
}

impl TeamFeed {
    pub fn new(
        catalog: Arc<AliasCatalog>,
        injuries: FeedCache<InjuryRecord>,
        lineups: FeedCache<LineupRecord>,
        injury_policy: UnresolvedPolicy,
        lineup_policy: UnresolvedPolicy,
    ) -> Self {
        TeamFeed {
            injuries,
            lineups,
            injury_resolver: NameResolver::new(Arc::clone(&catalog), injury_policy),
            lineup_resolver: NameResolver::new(catalog, lineup_policy),
        }
    }

    /// Every cached injury record matching `team`.
    ///
    /// A record matches when its raw team field and the query (or the
    /// query's canonical resolution) contain one another. Records are
    /// never re-keyed into an index, so matching stays tolerant of
    /// source spelling.
    pub async fn injuries(&self, team: &str) -> Vec<InjuryRecord> {
        let query = team.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let entry = self.injuries.get(false).await;
        let canonical = self
            .injury_resolver
            .resolve(team)
            .map(|name| name.to_lowercase());

        entry
            .records
            .iter()
            .filter(|record| {
                let record_team = record.team.to_lowercase();
                if record_team.is_empty() {
                    return false;
                }
                contains_either_way(&record_team, &query)
                    || canonical
                        .as_deref()
                        .is_some_and(|canonical| contains_either_way(&record_team, canonical))
            })
            .cloned()
            .collect()
    }

    /// The first cached lineup whose team resolves to the same identity
    /// as `team`.
    pub async fn lineup(&self, team: &str) -> Option<LineupRecord> {
        let canonical = self.lineup_resolver.resolve(team)?.to_lowercase();

        let entry = self.lineups.get(false).await;
        entry
            .records
            .iter()
            .find(|record| {
                self.lineup_resolver
                    .resolve(&record.team)
                    .is_some_and(|record_canonical| record_canonical.to_lowercase() == canonical)
            })
            .cloned()
    }

    /// Severity breakdown for `team`'s current injury list.
    pub async fn summarize(&self, team: &str) -> InjurySummary {
        InjurySummary::from_records(&self.injuries(team).await)
    }

    /// Force-refresh both categories, coalescing with any fetch already
    /// in flight.
    pub async fn refresh_all(&self) {
        let (_, _) = tokio::join!(self.injuries.get(true), self.lineups.get(true));
    }

    /// Current injuries cache entry (for freshness inspection); does not
    /// trigger a fetch.
    pub async fn injuries_entry(&self) -> Option<Arc<CacheEntry<InjuryRecord>>> {
        self.injuries.current().await
    }

    /// Current lineups cache entry; does not trigger a fetch.
    pub async fn lineups_entry(&self) -> Option<Arc<CacheEntry<LineupRecord>>> {
        self.lineups.current().await
    }
}

fn contains_either_way(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(info: &str, position: &str) -> InjuryRecord {
        InjuryRecord {
            league: "england-premier-league".to_string(),
            team: "Arsenal".to_string(),
            player_name: "Player".to_string(),
            position: position.to_string(),
            info: info.to_string(),
            expected_return: "N/A".to_string(),
        }
    }

    #[test]
    fn test_summary_counts_by_bucket() {
        let records = vec![
            record("torn ACL, out for season", "Forward"),
            record("knock, assessed daily", "Defender"),
            record("minor bruise", "Defender"),
            record("hamstring strain", "Midfielder"),
        ];
        let summary = InjurySummary::from_records(&records);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.severe, 1);
        assert_eq!(summary.doubtful, 1);
        assert_eq!(summary.minor, 1);
        assert_eq!(summary.moderate, 1);
    }

    #[test]
    fn test_empty_summary_is_low_risk() {
        let summary = InjurySummary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.impact, 0.0);
        assert_eq!(summary.risk, RiskLevel::Low);
    }
}
