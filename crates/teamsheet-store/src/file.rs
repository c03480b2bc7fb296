//! Local JSON snapshot of the alias mapping
//!
//! Companion fallback for deployments where the remote endpoint is flaky:
//! the mapping is mirrored to a JSON file on disk and consulted when the
//! remote store is unavailable.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::StoreError;
use crate::store_traits::{AliasMap, AliasStore, StoreResult};

/// Alias mapping snapshot backed by a single JSON file.
///
/// `replace_all` writes a temporary file in the destination directory and
/// renames it over the target, so a concurrent `load_all` sees either the
/// old mapping or the new one in full.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AliasStore for JsonFileStore {
    async fn load_all(&self) -> StoreResult<AliasMap> {
        debug!(event = "store.load", path = %self.path.display());

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", self.path.display())))?;

        Ok(serde_json::from_str(&raw)?)
    }

    async fn replace_all(&self, mapping: &AliasMap) -> StoreResult<()> {
        debug!(event = "store.replace", path = %self.path.display(), entries = mapping.len());

        let body = serde_json::to_string_pretty(mapping)?;
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        // Temp file must live on the same filesystem as the target for the
        // final rename to be atomic.
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(body.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        Ok(())
    }
}
