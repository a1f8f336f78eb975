//! Local version control
//!
//! The publish workflow talks to the working tree only through
//! `VersionControl`; `GitCli` implements it on top of the `git` executable.

pub mod git;

use crate::error::FishResult;
use async_trait::async_trait;

pub use git::GitCli;

/// Working tree status, bucketed the way the publish workflow consumes it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryStatus {
    pub conflicted: Vec<String>,
    /// Untracked paths
    pub not_added: Vec<String>,
    pub created: Vec<String>,
    pub deleted: Vec<String>,
    pub modified: Vec<String>,
    /// Destination paths of renames
    pub renamed: Vec<String>,
    /// Deletions already recorded in the index (`git rm`); also listed in `deleted`
    pub staged_removals: Vec<String>,
}

impl RepositoryStatus {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicted.is_empty()
    }

    /// Whether anything is waiting to be committed
    pub fn has_changes(&self) -> bool {
        !(self.not_added.is_empty()
            && self.created.is_empty()
            && self.deleted.is_empty()
            && self.modified.is_empty()
            && self.renamed.is_empty())
    }

    /// Every non-conflicted path that still needs staging, without duplicates.
    ///
    /// Staged removals are left out: the path exists neither on disk nor in
    /// the index, so `git add` would reject it.
    pub fn pending_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = Vec::new();
        for path in self
            .not_added
            .iter()
            .chain(&self.created)
            .chain(&self.deleted)
            .chain(&self.modified)
            .chain(&self.renamed)
        {
            if !paths.contains(path) && !self.staged_removals.contains(path) {
                paths.push(path.clone());
            }
        }
        paths
    }
}

/// A configured remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

/// Operations the publish workflow needs from a local repository
#[async_trait]
pub trait VersionControl: Send + Sync {
    async fn status(&self) -> FishResult<RepositoryStatus>;

    async fn add(&self, paths: &[String]) -> FishResult<()>;

    async fn commit(&self, message: &str) -> FishResult<()>;

    async fn init(&self) -> FishResult<()>;

    async fn add_remote(&self, name: &str, url: &str) -> FishResult<()>;

    async fn get_remotes(&self) -> FishResult<Vec<Remote>>;
}
