//! Storage trait definitions for the alias mapping
//!
//! `AliasStore` is the only seam between the resolver and persistence:
//! - `load_all`: read the complete canonical-name → alias-list mapping
//! - `replace_all`: swap in a complete new mapping, all-or-nothing
//!
//! The trait is async and backend-agnostic. An in-memory fake is provided
//! for testing via the `fakes` module.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::StoreError;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Canonical team name → ordered alias list.
///
/// Iteration order is sorted by canonical name, so first-match-wins
/// resolution of a colliding alias is reproducible across runs and across
/// backends.
pub type AliasMap = BTreeMap<String, Vec<String>>;

/// Alias mapping store.
///
/// Guarantees:
/// - `load_all` returns either the complete current mapping or
///   `StoreError::Unavailable`; never a partial mapping.
/// - `replace_all` is all-or-nothing: a reader performing a subsequent
///   `load_all` sees either the old mapping or the new one, never a mix.
#[async_trait]
pub trait AliasStore: Send + Sync {
    /// Read the complete mapping.
    async fn load_all(&self) -> StoreResult<AliasMap>;

    /// Replace the complete mapping atomically.
    async fn replace_all(&self, mapping: &AliasMap) -> StoreResult<()>;
}

/// A name claimed by more than one canonical entry.
///
/// Resolution still works (the lexicographically first owner wins), but a
/// collision usually means the mapping needs cleanup, so loads surface
/// these for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasCollision {
    /// The colliding name, case-folded
    pub name: String,
    /// Canonical entry that wins resolution
    pub first_owner: String,
    /// Canonical entry whose claim is shadowed
    pub shadowed_owner: String,
}

/// Scan a mapping for aliases claimed by more than one canonical entry,
/// or equal (case-folded) to another entry's canonical name.
pub fn scan_collisions(mapping: &AliasMap) -> Vec<AliasCollision> {
    let mut owners: BTreeMap<String, &str> = BTreeMap::new();
    let mut collisions = Vec::new();

    // Canonical names claim themselves first, in sorted order.
    for canonical in mapping.keys() {
        owners
            .entry(canonical.to_lowercase())
            .or_insert(canonical.as_str());
    }

    for (canonical, aliases) in mapping {
        for alias in aliases {
            let folded = alias.trim().to_lowercase();
            if folded.is_empty() {
                continue;
            }
            match owners.get(folded.as_str()).copied() {
                Some(owner) if owner != canonical.as_str() => collisions.push(AliasCollision {
                    name: folded,
                    first_owner: owner.to_string(),
                    shadowed_owner: canonical.clone(),
                }),
                Some(_) => {}
                None => {
                    owners.insert(folded, canonical.as_str());
                }
            }
        }
    }

    collisions
}
