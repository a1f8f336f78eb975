//! Dynamic command execution
//!
//! A dynamic command (e.g. `init`) is backed by a template package. The
//! executor makes sure the package is present (cache or local target path),
//! finds its entry point and runs it in a child `node` process. The child's
//! exit code is the command's result.

use crate::config::CliConfig;
use crate::error::{FishError, FishResult};
use crate::package::manifest::to_portable;
use crate::package::{ArtifactCache, Installer, PackageSource, VersionRequest};
use crate::registry::PackageRegistry;
use crate::runtime::{self, ProcessRunner, RunOptions};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// A package ready to run
#[derive(Debug, Clone)]
pub struct PreparedPackage {
    pub name: String,
    /// Resolved version; `None` for local target paths
    pub version: Option<String>,
    pub entry: PathBuf,
}

pub struct Executor {
    config: CliConfig,
    registry: Arc<dyn PackageRegistry>,
    installer: Arc<dyn Installer>,
    runner: Arc<dyn ProcessRunner>,
    check_runtime: bool,
}

impl Executor {
    pub fn new(
        config: CliConfig,
        registry: Arc<dyn PackageRegistry>,
        installer: Arc<dyn Installer>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            config,
            registry,
            installer,
            runner,
            check_runtime: true,
        }
    }

    /// Skip the Node.js version check (the runner is not a real node)
    pub fn without_runtime_check(mut self) -> Self {
        self.check_runtime = false;
        self
    }

    /// Package handle for `name`, honoring the configured target path
    pub fn package(&self, name: &str) -> ArtifactCache {
        let source = match &self.config.target_path {
            Some(path) => PackageSource::Local(path.clone()),
            None => PackageSource::Cached {
                store_dir: self.config.store_dir(),
            },
        };
        debug!(package = name, ?source, "package source");

        ArtifactCache::new(
            name,
            VersionRequest::Latest,
            source,
            self.registry.clone(),
            self.installer.clone(),
        )
    }

    /// Install or update the package and locate its entry point
    pub async fn prepare(&self, name: &str) -> FishResult<PreparedPackage> {
        let mut package = self.package(name);
        package.ensure_installed().await?;

        let entry = package.entry_point()?.ok_or_else(|| FishError::ArtifactNotFound {
            package: name.to_string(),
            location: self
                .config
                .target_path
                .clone()
                .unwrap_or_else(|| self.config.store_dir()),
        })?;

        info!(package = name, entry = %entry.display(), "package ready");
        Ok(PreparedPackage {
            name: name.to_string(),
            version: match package.source() {
                PackageSource::Cached { .. } => package.resolved_version().map(str::to_string),
                PackageSource::Local(_) => None,
            },
            entry,
        })
    }

    /// Run a prepared entry point with `payload` as its argument list
    pub async fn run(
        &self,
        prepared: &PreparedPackage,
        payload: &Value,
        cwd: &Path,
    ) -> FishResult<i32> {
        if self.check_runtime {
            runtime::require_node()?;
        }

        let args = vec!["-e".to_string(), entry_script(&prepared.entry, payload)];
        let options = RunOptions {
            cwd: Some(cwd.to_path_buf()),
        };
        self.runner.run("node", &args, &options).await
    }

    pub async fn execute(&self, name: &str, payload: &Value, cwd: &Path) -> FishResult<i32> {
        let prepared = self.prepare(name).await?;
        self.run(&prepared, payload, cwd).await
    }
}

/// Script passed to `node -e`: require the entry and call it with the payload
pub fn entry_script(entry: &Path, payload: &Value) -> String {
    let entry = Value::String(to_portable(entry));
    let args = match payload {
        Value::Array(_) => payload.clone(),
        other => Value::Array(vec![other.clone()]),
    };
    format!("require({}).call(null, {})", entry, args)
}
