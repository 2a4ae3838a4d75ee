use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use directories::ProjectDirs;

/// Where the bearer token for the catalog endpoint lives between runs.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn token(&self) -> Result<Option<String>>;
    async fn set_token(&self, token: &str) -> Result<()>;
    /// Forget everything stored for the session.
    async fn clear(&self) -> Result<()>;
}

/// Token kept in a single file; a missing file means no session.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `access_token` under the user's data directory.
    pub fn default_location() -> Result<Self> {
        let proj = ProjectDirs::from("dev", "closet", "closet")
            .context("unable to determine data directory for the session token")?;
        Ok(Self::new(proj.data_dir().join("access_token")))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn token(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(s) => {
                let t = s.trim();
                Ok((!t.is_empty()).then(|| t.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("reading session token: {}", self.path.display()))
            }
        }
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating session dir: {}", parent.display()))?;
        }
        tokio::fs::write(&self.path, token.trim())
            .await
            .with_context(|| format!("writing session token: {}", self.path.display()))
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("removing session token: {}", self.path.display()))
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_string())) }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn token(&self) -> Result<Option<String>> {
        Ok(self.token.lock().map_err(|_| anyhow::anyhow!("session lock poisoned"))?.clone())
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        let mut slot = self.token.lock().map_err(|_| anyhow::anyhow!("session lock poisoned"))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.lock().map_err(|_| anyhow::anyhow!("session lock poisoned"))? = None;
        Ok(())
    }
}
