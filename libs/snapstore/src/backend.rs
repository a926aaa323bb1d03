//! Storage backends: where the serialized collection text actually lives.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Raw text storage for named collections.
///
/// `read_text` returns `None` when the collection key is entirely absent,
/// which is distinct from an empty collection (`Some("[]")`). Bootstrap
/// seeding relies on that distinction.
#[async_trait]
pub trait SnapshotBackend: Send + Sync {
    async fn read_text(&self, collection: &str) -> anyhow::Result<Option<String>>;
    async fn write_text(&self, collection: &str, text: &str) -> anyhow::Result<()>;
}

/// In-memory backend. The default for tests and `--zero-latency` local runs.
#[derive(Default)]
pub struct MemoryBackend {
    cells: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotBackend for MemoryBackend {
    async fn read_text(&self, collection: &str) -> anyhow::Result<Option<String>> {
        Ok(self.cells.lock().get(collection).cloned())
    }

    async fn write_text(&self, collection: &str, text: &str) -> anyhow::Result<()> {
        self.cells
            .lock()
            .insert(collection.to_string(), text.to_string());
        Ok(())
    }
}

/// File backend: one `<collection>.json` file per collection under `root`.
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{collection}.json"))
    }
}

#[async_trait]
impl SnapshotBackend for FileBackend {
    async fn read_text(&self, collection: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(collection);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    async fn write_text(&self, collection: &str, text: &str) -> anyhow::Result<()> {
        let path = self.path_for(collection);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("writing {}", path.display()))
    }
}

async fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await
}
