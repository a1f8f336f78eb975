//! Publishing a local project to a hosting provider
//!
//! This module provides:
//! - `ProjectInfo`: name and version of the project being published
//! - `PublishWorkflow`: the resumable bootstrap from provider selection to first commit
//! - The default ignore file written into fresh projects

pub mod ignore;
pub mod workflow;

use crate::error::FishResult;
use crate::hosting::{OwnerKind, ProviderKind, Repository};
use crate::package::PackageManifest;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use workflow::PublishWorkflow;

/// Version reported for projects without a manifest version
const UNVERSIONED: &str = "0.0.0";

/// The project being published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    /// Repository name on the hosting provider
    pub name: String,
    pub version: String,
    /// Working tree root
    pub dir: PathBuf,
}

impl ProjectInfo {
    /// Read name and version from `dir/package.json`, falling back to the
    /// directory name
    pub fn from_dir(dir: &Path) -> FishResult<Self> {
        let manifest = if dir.join(crate::package::manifest::MANIFEST_FILE).is_file() {
            PackageManifest::read(dir)?
        } else {
            debug!(dir = %dir.display(), "no manifest, using directory name");
            PackageManifest::default()
        };

        let name = manifest
            .name
            .filter(|n| !n.trim().is_empty())
            .or_else(|| {
                dir.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| "project".to_string());

        Ok(Self {
            name,
            version: manifest.version.unwrap_or_else(|| UNVERSIONED.to_string()),
            dir: dir.to_path_buf(),
        })
    }
}

/// Which persisted choices to ask for again
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishOptions {
    pub refresh_provider: bool,
    pub refresh_token: bool,
    pub refresh_owner: bool,
}

/// Account that owns the remote repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownership {
    pub kind: OwnerKind,
    pub login: String,
}

/// What a publish run ended up doing
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    pub provider: ProviderKind,
    pub owner: Ownership,
    pub repository: Repository,
    /// True when the remote repository was created by this run
    pub created_repository: bool,
    pub remote_url: String,
    /// True when the local repository was initialized by this run
    pub initialized: bool,
    /// Commit message, when a commit was made
    pub commit: Option<String>,
}
