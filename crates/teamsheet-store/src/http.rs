//! Remote alias mapping endpoint client
//!
//! The system of record for team mappings is a key-value HTTP endpoint:
//! GET returns the full `{canonical: [aliases...]}` JSON object, POST
//! replaces it wholesale. The server performs the replace as a single
//! document write, so readers never observe a partial mapping.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::StoreError;
use crate::store_traits::{AliasMap, AliasStore, StoreResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the remote mapping endpoint
pub struct HttpAliasStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAliasStore {
    /// Create a client for the endpoint rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("teamsheet-store/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        HttpAliasStore {
            base_url: base_url.into(),
            client,
        }
    }

    fn mappings_url(&self) -> String {
        format!("{}/mappings", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl AliasStore for HttpAliasStore {
    async fn load_all(&self) -> StoreResult<AliasMap> {
        let url = self.mappings_url();
        debug!(event = "store.load", url = %url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Unavailable(format!(
                "mapping endpoint returned {}",
                response.status()
            )));
        }

        response
            .json::<AliasMap>()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn replace_all(&self, mapping: &AliasMap) -> StoreResult<()> {
        let url = self.mappings_url();
        debug!(event = "store.replace", url = %url, entries = mapping.len());

        let response = self
            .client
            .post(&url)
            .json(mapping)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Unavailable(format!(
                "mapping endpoint returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mappings_url_strips_trailing_slash() {
        let store = HttpAliasStore::new("https://example.test/api/");
        assert_eq!(store.mappings_url(), "https://example.test/api/mappings");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_maps_to_unavailable() {
        // Nothing listens on port 1; the connection is refused immediately.
        let store = HttpAliasStore::new("http://127.0.0.1:1");
        match store.load_all().await {
            Err(StoreError::Unavailable(_)) => {}
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }
}
