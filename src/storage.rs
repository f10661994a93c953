use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::Context;
use axum::async_trait;
use tokio::sync::Mutex;

/// Whole-document persistence: each named document is read and overwritten
/// in full, never patched.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns `None` when the document does not exist yet.
    async fn read(&self, name: &str) -> anyhow::Result<Option<String>>;
    async fn write(&self, name: &str, contents: &str) -> anyhow::Result<()>;
}

/// Documents as flat files under a data directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DocumentStore for FsStore {
    async fn read(&self, name: &str) -> anyhow::Result<Option<String>> {
        let path = self.dir.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }

    async fn write(&self, name: &str, contents: &str) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create {}", self.dir.display()))?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, contents)
            .await
            .with_context(|| format!("write {}", path.display()))
    }
}

/// In-memory store backing `AppState::fake()` and store tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, name: &str) -> anyhow::Result<Option<String>> {
        Ok(self.docs.lock().await.get(name).cloned())
    }

    async fn write(&self, name: &str, contents: &str) -> anyhow::Result<()> {
        self.docs
            .lock()
            .await
            .insert(name.to_string(), contents.to_string());
        Ok(())
    }
}
