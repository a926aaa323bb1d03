//! Snapshot persistence store.
//!
//! Collections are read and written as complete JSON snapshots through a
//! pluggable backend. Every operation sleeps a configurable latency before
//! touching the backend, modeling the network round-trip of the mock backend
//! this store stands in for.
//!
//! There is no partial update and no cross-caller locking: callers read the
//! full collection, compute the new full collection, and write it back.
//! Two tasks racing on the same collection are last-write-wins. Single-writer
//! usage is the supported scenario.
//!
//! # Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use snapstore::{MemoryBackend, Store};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), snapstore::StoreError> {
//! let store = Store::new(Arc::new(MemoryBackend::new()), Duration::ZERO);
//! store.save("users", &["alice".to_string()]).await?;
//! let users: Vec<String> = store.load("users").await?;
//! assert_eq!(users, vec!["alice".to_string()]);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod store;

pub use backend::{FileBackend, MemoryBackend, SnapshotBackend};
pub use store::Store;

use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend could not read or write the collection.
    #[error("backend error on collection '{collection}': {source}")]
    Backend {
        collection: String,
        #[source]
        source: anyhow::Error,
    },

    /// The stored text is not a valid snapshot of the requested type.
    #[error("corrupt snapshot in collection '{collection}': {source}")]
    Corrupt {
        collection: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn backend(collection: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Backend {
            collection: collection.into(),
            source,
        }
    }

    pub fn corrupt(collection: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            collection: collection.into(),
            source,
        }
    }
}
