//! Extraction pass outcomes
//!
//! A [`Harvest`] is what one full extraction pass produces: the records
//! that could be extracted, plus a side channel of per-source failure
//! reasons for logging. Extractors never throw past their boundary: a
//! source that fails contributes a [`SourceFailure`] instead of aborting
//! its siblings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Where a harvest's records came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarvestOrigin {
    /// Records extracted from live documents
    Live,
    /// Synthetic placeholder data emitted because every source failed
    Fallback,
}

/// One source (league page, preview link) that failed during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFailure {
    /// Source identifier (league slug or URL)
    pub source: String,
    /// Failure reason, for logging only
    pub reason: String,
}

/// Result of one settle-all extraction pass.
#[derive(Debug, Clone)]
pub struct Harvest<R> {
    pub records: Vec<R>,
    pub failures: Vec<SourceFailure>,
    pub origin: HarvestOrigin,
}

impl<R> Harvest<R> {
    pub fn live(records: Vec<R>, failures: Vec<SourceFailure>) -> Self {
        Harvest {
            records,
            failures,
            origin: HarvestOrigin::Live,
        }
    }

    pub fn fallback(records: Vec<R>, failures: Vec<SourceFailure>) -> Self {
        Harvest {
            records,
            failures,
            origin: HarvestOrigin::Fallback,
        }
    }

    /// True when the pass produced no usable live data: either every
    /// source failed outright, or only placeholder records remain.
    pub fn is_degraded(&self) -> bool {
        self.origin == HarvestOrigin::Fallback
            || (self.records.is_empty() && !self.failures.is_empty())
    }
}

/// A category extractor the aggregation layer can drive.
///
/// Guarantees:
/// - `collect` never returns an error; failures are folded into the
///   harvest's failure list.
/// - All per-source fetches within one call are settled (success or
///   failure) before the call returns.
#[async_trait]
pub trait RecordSource<R>: Send + Sync {
    async fn collect(&self) -> Harvest<R>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_harvest_with_records_is_not_degraded() {
        let harvest = Harvest::live(vec![1, 2], vec![]);
        assert!(!harvest.is_degraded());
    }

    #[test]
    fn test_partial_failures_with_records_are_not_degraded() {
        let harvest = Harvest::live(
            vec![1],
            vec![SourceFailure {
                source: "league-b".to_string(),
                reason: "timeout".to_string(),
            }],
        );
        assert!(!harvest.is_degraded());
    }

    #[test]
    fn test_all_sources_failed_is_degraded() {
        let harvest: Harvest<u8> = Harvest::live(
            vec![],
            vec![SourceFailure {
                source: "league-a".to_string(),
                reason: "503".to_string(),
            }],
        );
        assert!(harvest.is_degraded());
    }

    #[test]
    fn test_fallback_origin_is_degraded_even_with_records() {
        let harvest = Harvest::fallback(vec![1], vec![]);
        assert!(harvest.is_degraded());
    }
}
