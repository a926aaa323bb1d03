//! Typed facade over a [`SnapshotBackend`] with simulated latency.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::backend::SnapshotBackend;
use crate::{Result, StoreError};

/// Handle to the snapshot store.
///
/// Cheap to clone; clones share the backend and latency setting.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn SnapshotBackend>,
    latency: Duration,
}

impl Store {
    /// `latency` is applied before every backend access. Pass
    /// `Duration::ZERO` in tests.
    pub fn new(backend: Arc<dyn SnapshotBackend>, latency: Duration) -> Self {
        Self { backend, latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Load the full collection. An absent key yields an empty vec.
    pub async fn load<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        self.round_trip().await;
        let text = self
            .backend
            .read_text(collection)
            .await
            .map_err(|e| StoreError::backend(collection, e))?;

        match text {
            None => Ok(Vec::new()),
            Some(text) => {
                let items: Vec<T> = serde_json::from_str(&text)
                    .map_err(|e| StoreError::corrupt(collection, e))?;
                debug!(collection, count = items.len(), "loaded collection");
                Ok(items)
            }
        }
    }

    /// Replace the full collection snapshot.
    pub async fn save<T: Serialize>(&self, collection: &str, items: &[T]) -> Result<()> {
        self.round_trip().await;
        let text = serde_json::to_string_pretty(items)
            .map_err(|e| StoreError::corrupt(collection, e))?;
        self.backend
            .write_text(collection, &text)
            .await
            .map_err(|e| StoreError::backend(collection, e))?;
        debug!(collection, count = items.len(), "saved collection");
        Ok(())
    }

    /// Whether the collection key exists at all (even as an empty snapshot).
    pub async fn contains(&self, collection: &str) -> Result<bool> {
        self.round_trip().await;
        let text = self
            .backend
            .read_text(collection)
            .await
            .map_err(|e| StoreError::backend(collection, e))?;
        Ok(text.is_some())
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}
