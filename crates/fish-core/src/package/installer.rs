//! Package installer collaborator
//!
//! The cache decides *whether* and *where* to install; an `Installer` does the
//! actual download. `NpmInstaller` shells out to npm.

use crate::error::{FishError, FishResult};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;
use url::Url;

/// A single package to install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    pub name: String,
    pub version: String,
}

impl PackageSpec {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// `name@version` as understood by npm
    pub fn spec(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

/// Everything an installer needs for one install
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    /// Directory the packages are installed into
    pub root: PathBuf,
    /// Cache storage root
    pub store_dir: PathBuf,
    /// Registry to download from
    pub registry: Url,
    pub packages: Vec<PackageSpec>,
}

/// Installs packages from a registry into the cache
#[async_trait]
pub trait Installer: Send + Sync {
    async fn install(&self, request: &InstallRequest) -> FishResult<()>;
}

/// Installer backed by the `npm` executable
#[derive(Debug, Clone, Default)]
pub struct NpmInstaller;

impl NpmInstaller {
    fn program() -> &'static str {
        if cfg!(windows) {
            "npm.cmd"
        } else {
            "npm"
        }
    }

    fn args(request: &InstallRequest) -> Vec<String> {
        let mut args = vec![
            "install".to_string(),
            "--prefix".to_string(),
            request.root.to_string_lossy().into_owned(),
            "--no-save".to_string(),
            "--no-package-lock".to_string(),
            "--registry".to_string(),
            request.registry.to_string(),
        ];
        args.extend(request.packages.iter().map(PackageSpec::spec));
        args
    }
}

#[async_trait]
impl Installer for NpmInstaller {
    async fn install(&self, request: &InstallRequest) -> FishResult<()> {
        let packages = request
            .packages
            .iter()
            .map(PackageSpec::spec)
            .collect::<Vec<_>>()
            .join(" ");

        tokio::fs::create_dir_all(&request.root)
            .await
            .map_err(|e| FishError::io(format!("creating {}", request.root.display()), e))?;

        let args = Self::args(request);
        debug!(program = Self::program(), ?args, "running installer");

        let output = Command::new(Self::program())
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| FishError::process(Self::program(), e))?;

        if !output.status.success() {
            return Err(FishError::InstallFailed {
                package: packages,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        debug!(packages = %packages, "installed");
        Ok(())
    }
}
