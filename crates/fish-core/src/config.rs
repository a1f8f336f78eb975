//! Explicit runtime configuration threaded through every component
//!
//! Nothing in the library reads the process environment. The binary resolves
//! the home directory, target path and registry once and builds a `CliConfig`.

use crate::error::{FishError, FishResult};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Mirror registry used by default
pub const DEFAULT_REGISTRY: &str = "https://registry.npmmirror.com";

/// Upstream registry, selectable for diagnostics
pub const ORIGINAL_REGISTRY: &str = "https://registry.npmjs.org";

/// Subdirectory of the CLI home holding installed template packages
const DEPENDENCIES_DIR: &str = "dependencies";

/// Subdirectory of the dependencies dir used as the cache storage root
const STORE_DIR: &str = "node_modules";

/// Subdirectory of the CLI home holding persisted publish choices
const CREDENTIALS_DIR: &str = ".git";

/// Which registry root to query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryRoot {
    Default,
    Original,
    Custom(Url),
}

impl RegistryRoot {
    /// Pick the default mirror or the upstream registry
    pub fn select(original: bool) -> Self {
        if original {
            Self::Original
        } else {
            Self::Default
        }
    }

    pub fn url(&self) -> Url {
        match self {
            // Both constants are valid absolute URLs
            Self::Default => Url::parse(DEFAULT_REGISTRY).expect("valid default registry"),
            Self::Original => Url::parse(ORIGINAL_REGISTRY).expect("valid original registry"),
            Self::Custom(url) => url.clone(),
        }
    }
}

/// Runtime configuration for a single CLI invocation
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Per-user CLI home (e.g. ~/.fish-cli-dev)
    pub home: PathBuf,
    /// Local package directory used instead of the cache (development mode)
    pub target_path: Option<PathBuf>,
    /// Registry queried for package versions
    pub registry: RegistryRoot,
}

impl CliConfig {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            target_path: None,
            registry: RegistryRoot::Default,
        }
    }

    pub fn with_target_path(mut self, target_path: Option<PathBuf>) -> Self {
        self.target_path = target_path;
        self
    }

    pub fn with_registry(mut self, registry: RegistryRoot) -> Self {
        self.registry = registry;
        self
    }

    /// Root handed to the installer for cached packages
    pub fn dependencies_dir(&self) -> PathBuf {
        self.home.join(DEPENDENCIES_DIR)
    }

    /// Cache storage root holding one directory per (package, version)
    pub fn store_dir(&self) -> PathBuf {
        self.dependencies_dir().join(STORE_DIR)
    }

    /// Directory holding one flat file per persisted publish choice
    pub fn credentials_dir(&self) -> PathBuf {
        self.home.join(CREDENTIALS_DIR)
    }
}

/// Create a directory (and parents) and verify it afterwards
pub fn ensure_dir(path: &Path) -> FishResult<()> {
    fs::create_dir_all(path).map_err(|e| FishError::Configuration {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !path.is_dir() {
        return Err(FishError::Configuration {
            path: path.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    Ok(())
}
