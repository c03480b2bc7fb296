//! In-memory fake for the alias store (testing only)
//!
//! `MemoryAliasStore` satisfies the `AliasStore` contract without any
//! backing service, and can be toggled unavailable to exercise the
//! snapshot-retention fallback in callers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::store_traits::{AliasMap, AliasStore, StoreResult};

/// In-memory alias store backed by a `Mutex<AliasMap>`.
#[derive(Debug)]
pub struct MemoryAliasStore {
    mapping: Mutex<AliasMap>,
    available: AtomicBool,
}

impl MemoryAliasStore {
    pub fn new() -> Self {
        MemoryAliasStore {
            mapping: Mutex::new(AliasMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Create a store pre-seeded with `mapping`.
    pub fn with(mapping: AliasMap) -> Self {
        MemoryAliasStore {
            mapping: Mutex::new(mapping),
            available: AtomicBool::new(true),
        }
    }

    /// Toggle availability; while `false`, every operation returns
    /// `StoreError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("store offline".to_string()))
        }
    }
}

#[async_trait]
impl AliasStore for MemoryAliasStore {
    async fn load_all(&self) -> StoreResult<AliasMap> {
        self.check_available()?;
        Ok(self.mapping.lock().unwrap().clone())
    }

    async fn replace_all(&self, mapping: &AliasMap) -> StoreResult<()> {
        self.check_available()?;
        *self.mapping.lock().unwrap() = mapping.clone();
        Ok(())
    }
}
