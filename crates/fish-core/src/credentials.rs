//! File-backed store for publish choices
//!
//! One flat file per key under the credential root; the whole file content is
//! the value. A present, non-empty file means the operator already confirmed
//! that value. Nothing here deletes files.
//!
//! The token file is shared by every provider; switching providers with
//! `--refresh-server` also needs `--refresh-token`.
//!
//! There is no locking: two concurrent invocations against the same home
//! directory can overwrite each other's choices.

use crate::config::ensure_dir;
use crate::error::{FishError, FishResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Persisted publish choices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKey {
    /// Selected hosting provider
    Provider,
    /// API token for the provider
    Token,
    /// Owner kind: individual user or organization
    OwnerKind,
    /// Login of the owning user or organization
    OwnerLogin,
}

impl CredentialKey {
    pub fn file_name(self) -> &'static str {
        match self {
            CredentialKey::Provider => ".git_server",
            CredentialKey::Token => ".git_token",
            CredentialKey::OwnerKind => ".git_own",
            CredentialKey::OwnerLogin => ".git_login",
        }
    }
}

/// Flat key/value store rooted at a per-user directory
#[derive(Debug, Clone)]
pub struct CredentialStore {
    root: PathBuf,
}

impl CredentialStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root directory if needed
    pub fn ensure_root(&self) -> FishResult<()> {
        ensure_dir(&self.root)
    }

    pub fn path(&self, key: CredentialKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Stored value; missing files and blank content both read as `None`
    pub fn read(&self, key: CredentialKey) -> FishResult<Option<String>> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let value = content.trim();
                Ok((!value.is_empty()).then(|| value.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FishError::io(format!("reading {}", path.display()), e)),
        }
    }

    pub fn write(&self, key: CredentialKey, value: &str) -> FishResult<()> {
        self.ensure_root()?;
        let path = self.path(key);
        fs::write(&path, value)
            .map_err(|e| FishError::io(format!("writing {}", path.display()), e))?;
        debug!(key = ?key, path = %path.display(), "stored value");
        Ok(())
    }
}
