//! Injury severity classification
//!
//! Deterministic keyword-family bucketing over the free-text injury
//! description, plus the cosmetic squad-impact estimate shown next to a
//! team's injury list. None of this is a medical model; it exists to
//! sort and badge records for display.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use teamsheet_scrape::InjuryRecord;

/// Severity bucket for one injury description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Severe,
    Moderate,
    Minor,
    Doubtful,
}

fn severe_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new("long|serious|surgery|months|season|torn|rupture|fracture").unwrap()
    })
}

fn doubtful_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("doubt|test|fitness|assess").unwrap())
}

fn minor_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("minor|knock|days|bruise").unwrap())
}

/// Bucket an injury description.
///
/// The doubtful family is checked before minor so that fitness-doubt
/// wording ("knock, assessed daily") buckets as doubtful even when a
/// minor keyword is also present. Anything unmatched is moderate.
pub fn classify(info: &str) -> Severity {
    let folded = info.to_lowercase();
    if severe_pattern().is_match(&folded) {
        Severity::Severe
    } else if doubtful_pattern().is_match(&folded) {
        Severity::Doubtful
    } else if minor_pattern().is_match(&folded) {
        Severity::Minor
    } else {
        Severity::Moderate
    }
}

fn severity_weight(severity: Severity) -> f32 {
    match severity {
        Severity::Severe => 4.0,
        Severity::Moderate => 2.5,
        Severity::Minor => 1.0,
        Severity::Doubtful => 0.7,
    }
}

fn position_weight(position: &str) -> f32 {
    let folded = position.to_lowercase();
    if folded.contains("forward") || folded.contains("striker") {
        1.4
    } else if folded.contains("goalkeeper") {
        1.5
    } else if folded.contains("midfielder") {
        1.2
    } else {
        1.0
    }
}

/// Estimated squad impact in the 0–30 range.
pub fn estimate_impact(records: &[InjuryRecord]) -> f32 {
    let impact: f32 = records
        .iter()
        .map(|r| severity_weight(classify(&r.info)) * position_weight(&r.position) * 2.5)
        .sum();
    impact.min(30.0)
}

/// Display badge derived from the impact estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

pub fn risk_level(impact: f32) -> RiskLevel {
    if impact > 15.0 {
        RiskLevel::High
    } else if impact > 8.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
