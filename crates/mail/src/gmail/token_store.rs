//! Persistence for the Gmail OAuth token
//!
//! The token lives in a single JSON file in production. `MemoryTokenStore`
//! keeps it in memory so tests never touch the filesystem or the network.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Stored token data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds) after which the access token is unusable
    pub expires_at: Option<i64>,
}

impl StoredToken {
    /// Seconds before expiry at which a token is already treated as expired
    pub const EXPIRY_BUFFER_SECS: i64 = 300;

    /// Whether the access token can still be used at `now`
    pub fn is_valid_at(&self, now: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at > now + Self::EXPIRY_BUFFER_SECS)
    }
}

/// Load/save/clear operations for the cached credential
pub trait TokenStore: Send + Sync {
    /// Load the stored token, `None` if nothing has been stored yet
    fn load(&self) -> Result<Option<StoredToken>>;

    /// Persist a token, replacing any previous one
    fn save(&self, token: &StoredToken) -> Result<()>;

    /// Forget the stored token (logout)
    fn clear(&self) -> Result<()>;
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn load(&self) -> Result<Option<StoredToken>> {
        (**self).load()
    }

    fn save(&self, token: &StoredToken) -> Result<()> {
        (**self).save(token)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// Token stored as pretty JSON in a file
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<StoredToken>> {
        if !self.path.exists() {
            return Ok(None);
        }
        config::load_json_file(&self.path).map(Some)
    }

    fn save(&self, token: &StoredToken) -> Result<()> {
        config::save_json_file(&self.path, token)
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove token file: {}", self.path.display()))?;
        }
        Ok(())
    }
}

/// Token held in memory
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<StoredToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: StoredToken) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<StoredToken>> {
        let guard = self
            .token
            .lock()
            .map_err(|_| anyhow::anyhow!("token store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn save(&self, token: &StoredToken) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| anyhow::anyhow!("token store lock poisoned"))?;
        *guard = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| anyhow::anyhow!("token store lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}
