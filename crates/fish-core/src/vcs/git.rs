//! `VersionControl` backed by the git executable

use super::{Remote, RepositoryStatus, VersionControl};
use crate::error::{FishError, FishResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Runs git commands inside one working tree
#[derive(Debug, Clone)]
pub struct GitCli {
    dir: PathBuf,
}

impl GitCli {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn run(&self, args: &[&str]) -> FishResult<String> {
        debug!(?args, dir = %self.dir.display(), "git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| FishError::process("git", e))?;

        if !output.status.success() {
            return Err(FishError::VersionControl {
                command: args.first().copied().unwrap_or_default().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn status(&self) -> FishResult<RepositoryStatus> {
        let raw = self.run(&["status", "--porcelain=v1", "-z"]).await?;
        Ok(parse_porcelain(&raw))
    }

    async fn add(&self, paths: &[String]) -> FishResult<()> {
        if paths.is_empty() {
            return Ok(());
        }
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run(&args).await.map(|_| ())
    }

    async fn commit(&self, message: &str) -> FishResult<()> {
        self.run(&["commit", "-m", message]).await.map(|_| ())
    }

    async fn init(&self) -> FishResult<()> {
        self.run(&["init"]).await.map(|_| ())
    }

    async fn add_remote(&self, name: &str, url: &str) -> FishResult<()> {
        self.run(&["remote", "add", name, url]).await.map(|_| ())
    }

    async fn get_remotes(&self) -> FishResult<Vec<Remote>> {
        let raw = self.run(&["remote", "-v"]).await?;
        Ok(parse_remotes(&raw))
    }
}

/// Parse `git status --porcelain=v1 -z` output
pub fn parse_porcelain(raw: &str) -> RepositoryStatus {
    let mut status = RepositoryStatus::default();
    let mut entries = raw.split('\0').filter(|e| !e.is_empty());

    while let Some(entry) = entries.next() {
        if entry.len() < 4 {
            continue;
        }
        let mut codes = entry.chars();
        let x = codes.next().unwrap_or(' ');
        let y = codes.next().unwrap_or(' ');
        let path = entry[3..].to_string();

        // Renames and copies carry the source path as the next entry
        if matches!(x, 'R' | 'C') {
            entries.next();
        }

        match (x, y) {
            ('?', '?') => status.not_added.push(path),
            ('D', 'D') | ('A', 'U') | ('U', 'D') | ('U', 'A') | ('D', 'U') | ('A', 'A')
            | ('U', 'U') => status.conflicted.push(path),
            _ => {
                if x == 'A' {
                    status.created.push(path.clone());
                }
                if x == 'R' {
                    status.renamed.push(path.clone());
                }
                if x == 'D' || y == 'D' {
                    status.deleted.push(path.clone());
                }
                if x == 'D' && y == ' ' {
                    status.staged_removals.push(path.clone());
                }
                if x == 'M' || y == 'M' {
                    status.modified.push(path);
                }
            }
        }
    }

    status
}

/// Parse `git remote -v`, keeping one entry per remote name
pub fn parse_remotes(raw: &str) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = Vec::new();
    for line in raw.lines() {
        let mut parts = line.split_whitespace();
        let (Some(name), Some(url)) = (parts.next(), parts.next()) else {
            continue;
        };
        if !remotes.iter().any(|r| r.name == name) {
            remotes.push(Remote {
                name: name.to_string(),
                url: url.to_string(),
            });
        }
    }
    remotes
}
