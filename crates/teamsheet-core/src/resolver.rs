//! Team identity resolution
//!
//! [`AliasCatalog`] owns the current alias mapping snapshot and its
//! reload discipline: a load either swaps in a complete new mapping or
//! keeps the previous one, so resolvers never observe a partially loaded
//! state. [`NameResolver`] matches free-text team names against the
//! snapshot in strict precedence order.

use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use teamsheet_store::{scan_collisions, AliasMap, AliasStore, StoreResult};

/// What to do with a name that matches nothing in the mapping.
///
/// Both behaviors exist in production: injury lookups drop unresolved
/// names, lineup lookups echo the query back as a synthetic identity so
/// records from the same source still group together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedPolicy {
    /// Unmatched names resolve to nothing
    Discard,
    /// Unmatched names resolve to themselves (trimmed)
    EchoQuery,
}

/// Outcome of a catalog reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadStatus {
    /// The primary store served a fresh mapping
    Primary,
    /// The primary was unavailable; the local fallback snapshot served
    Fallback,
    /// Nothing could be loaded; the previous snapshot stays in effect
    KeptLast,
}

/// The default mapping shipped with the system, used until a store load
/// succeeds.
pub fn default_mapping() -> AliasMap {
    let entries: &[(&str, &[&str])] = &[
        ("Manchester United", &["Man United", "MUFC", "Man Utd", "Manchester Utd"]),
        ("Manchester City", &["Man City", "MCFC", "City"]),
        ("Liverpool", &["Liverpool FC", "LFC", "The Reds"]),
        ("Arsenal", &["Arsenal FC", "AFC", "Gunners"]),
        ("Chelsea", &["Chelsea FC", "CFC", "Blues"]),
        ("Tottenham", &["Tottenham Hotspur", "Spurs", "THFC"]),
        ("Real Madrid", &["Real Madrid CF", "Madrid", "Los Blancos"]),
        ("Barcelona", &["FC Barcelona", "Barca", "FCB", "Barça"]),
        ("Atletico Madrid", &["Atletico de Madrid", "Atleti", "Atletico"]),
        ("Juventus", &["Juventus FC", "Juve", "Juventus Turin"]),
        ("Inter Milan", &["Inter", "Internazionale", "Inter Milano"]),
        ("AC Milan", &["Milan", "Rossoneri"]),
        ("Bayern Munich", &["Bayern München", "FC Bayern", "Bayern"]),
        ("Borussia Dortmund", &["BVB", "Dortmund", "Borussia"]),
        ("Paris Saint-Germain", &["PSG", "Paris SG", "Paris Saint Germain"]),
    ];
    entries
        .iter()
        .map(|(canonical, aliases)| {
            (
                canonical.to_string(),
                aliases.iter().map(|a| a.to_string()).collect(),
            )
        })
        .collect()
}

/// Holds the current alias mapping snapshot and the stores behind it.
///
/// The snapshot is swapped as a whole `Arc` on successful loads; a failed
/// load keeps the last good mapping in place.
pub struct AliasCatalog {
    primary: Arc<dyn AliasStore>,
    fallback: Option<Arc<dyn AliasStore>>,
    snapshot: RwLock<Arc<AliasMap>>,
}

impl AliasCatalog {
    /// Catalog starting from an empty mapping.
    pub fn new(primary: Arc<dyn AliasStore>) -> Self {
        AliasCatalog {
            primary,
            fallback: None,
            snapshot: RwLock::new(Arc::new(AliasMap::new())),
        }
    }

    /// Catalog starting from `initial` until the first successful load.
    pub fn seeded(primary: Arc<dyn AliasStore>, initial: AliasMap) -> Self {
        AliasCatalog {
            primary,
            fallback: None,
            snapshot: RwLock::new(Arc::new(initial)),
        }
    }

    /// Add a local fallback store consulted when the primary is
    /// unavailable.
    pub fn with_fallback(mut self, fallback: Arc<dyn AliasStore>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Reload the mapping. Never fails: on total unavailability the
    /// previous snapshot stays in effect and resolution carries on.
    pub async fn reload(&self) -> ReloadStatus {
        match self.primary.load_all().await {
            Ok(mapping) => {
                self.install(mapping);
                ReloadStatus::Primary
            }
            Err(e) => {
                warn!(event = "aliases.primary_unavailable", error = %e);
                if let Some(fallback) = &self.fallback {
                    match fallback.load_all().await {
                        Ok(mapping) => {
                            self.install(mapping);
                            return ReloadStatus::Fallback;
                        }
                        Err(e) => {
                            warn!(event = "aliases.fallback_unavailable", error = %e);
                        }
                    }
                }
                ReloadStatus::KeptLast
            }
        }
    }

    /// Replace the mapping in the primary store and swap it in locally.
    ///
    /// The local fallback snapshot is mirrored on a best-effort basis; a
    /// mirror failure is logged but does not fail the replace.
    pub async fn replace(&self, mapping: &AliasMap) -> StoreResult<()> {
        self.primary.replace_all(mapping).await?;
        if let Some(fallback) = &self.fallback {
            if let Err(e) = fallback.replace_all(mapping).await {
                warn!(event = "aliases.mirror_failed", error = %e);
            }
        }
        self.install(mapping.clone());
        Ok(())
    }

    /// Current mapping snapshot.
    pub fn snapshot(&self) -> Arc<AliasMap> {
        self.snapshot.read().unwrap().clone()
    }

    fn install(&self, mapping: AliasMap) {
        for collision in scan_collisions(&mapping) {
            warn!(
                event = "alias.collision",
                name = %collision.name,
                first_owner = %collision.first_owner,
                shadowed_owner = %collision.shadowed_owner,
            );
        }
        info!(event = "aliases.loaded", entries = mapping.len());
        *self.snapshot.write().unwrap() = Arc::new(mapping);
    }
}

/// Resolves free-text team names to canonical identities.
#[derive(Clone)]
pub struct NameResolver {
    catalog: Arc<AliasCatalog>,
    policy: UnresolvedPolicy,
}

impl NameResolver {
    pub fn new(catalog: Arc<AliasCatalog>, policy: UnresolvedPolicy) -> Self {
        NameResolver { catalog, policy }
    }

    /// Resolve `raw` against the current snapshot.
    ///
    /// Precedence, first match wins:
    /// 1. exact canonical name (case-folded)
    /// 2. exact alias of any entry
    /// 3. substring containment either way against any candidate name
    ///
    /// Entries are scanned in sorted canonical order, so a name claimed by
    /// several entries resolves the same way on every run. Empty input is
    /// unresolved under both policies.
    pub fn resolve(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let query = trimmed.to_lowercase();

        let snapshot = self.catalog.snapshot();
        if let Some(canonical) = resolve_in(&snapshot, &query) {
            return Some(canonical);
        }

        match self.policy {
            UnresolvedPolicy::Discard => None,
            UnresolvedPolicy::EchoQuery => Some(trimmed.to_string()),
        }
    }
}

fn resolve_in(mapping: &AliasMap, query: &str) -> Option<String> {
    for canonical in mapping.keys() {
        if canonical.to_lowercase() == query {
            return Some(canonical.clone());
        }
    }

    for (canonical, aliases) in mapping {
        if aliases.iter().any(|alias| alias.to_lowercase() == query) {
            return Some(canonical.clone());
        }
    }

    for (canonical, aliases) in mapping {
        let candidates =
            std::iter::once(canonical.as_str()).chain(aliases.iter().map(String::as_str));
        for candidate in candidates {
            let folded = candidate.to_lowercase();
            // An empty candidate would contain-match everything.
            if folded.is_empty() {
                continue;
            }
            if folded.contains(query) || query.contains(&folded) {
                return Some(canonical.clone());
            }
        }
    }

    None
}
