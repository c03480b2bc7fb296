//! Extracted record shapes
//!
//! One record is one fact pulled out of a source document. Records are
//! immutable once emitted; the aggregation layer discards them wholesale
//! when a cache entry is replaced.

use serde::{Deserialize, Serialize};

/// Sentinel for text fields the source did not provide.
pub const FIELD_ABSENT: &str = "N/A";

/// One injured or suspended player, as listed on a league injury page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjuryRecord {
    /// League slug the record was scraped under (e.g. "england-premier-league")
    pub league: String,
    /// Team name exactly as the source spelled it
    pub team: String,
    pub player_name: String,
    pub position: String,
    /// Free-text description of the injury
    pub info: String,
    /// Free-text expected return date
    pub expected_return: String,
}

/// One probable starting lineup from a match preview article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineupRecord {
    /// Team name exactly as the source spelled it
    pub team: String,
    /// Delimited player list (comma or semicolon separated)
    pub lineup: String,
    /// Preview article the lineup was extracted from
    pub source_url: String,
}

impl LineupRecord {
    /// Split the delimited lineup into trimmed player names.
    pub fn players(&self) -> Vec<&str> {
        self.lineup
            .split([';', ','])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_players_splits_on_both_delimiters() {
        let record = LineupRecord {
            team: "Arsenal".to_string(),
            lineup: "Raya; Saliba, Gabriel;  Rice , Saka".to_string(),
            source_url: "https://example.test/preview".to_string(),
        };
        assert_eq!(
            record.players(),
            vec!["Raya", "Saliba", "Gabriel", "Rice", "Saka"]
        );
    }

    #[test]
    fn test_players_drops_empty_segments() {
        let record = LineupRecord {
            team: "Chelsea".to_string(),
            lineup: "Sanchez;; James, ".to_string(),
            source_url: "https://example.test/preview".to_string(),
        };
        assert_eq!(record.players(), vec!["Sanchez", "James"]);
    }
}
