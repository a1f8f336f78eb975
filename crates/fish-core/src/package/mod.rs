//! Versioned template package cache
//!
//! An `ArtifactCache` tracks one package: it resolves the requested version
//! against the registry, maps it to a deterministic cache directory, installs
//! or updates through an `Installer`, and finds the package's entry point.
//! Superseded versions stay cached next to newer ones.

pub mod installer;
pub mod layout;
pub mod manifest;

use crate::error::{FishError, FishResult};
use crate::registry::PackageRegistry;
use installer::{InstallRequest, PackageSpec};
use layout::CacheLayout;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use installer::{Installer, NpmInstaller};
pub use manifest::PackageManifest;

/// Version sentinel meaning "whatever the registry reports as highest"
pub const LATEST: &str = "latest";

/// Requested package version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    Latest,
    Exact(String),
}

impl VersionRequest {
    pub fn parse(s: &str) -> Self {
        if s.trim().is_empty() || s == LATEST {
            Self::Latest
        } else {
            Self::Exact(s.to_string())
        }
    }
}

impl fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRequest::Latest => write!(f, "{}", LATEST),
            VersionRequest::Exact(v) => write!(f, "{}", v),
        }
    }
}

/// Where a package lives
#[derive(Debug, Clone)]
pub enum PackageSource {
    /// Installed into the cache storage root
    Cached { store_dir: PathBuf },
    /// A local package directory used as-is
    Local(PathBuf),
}

/// One package tracked through resolution, install and entry point lookup
pub struct ArtifactCache {
    name: String,
    requested: VersionRequest,
    resolved: Option<String>,
    source: PackageSource,
    registry: Arc<dyn PackageRegistry>,
    installer: Arc<dyn Installer>,
}

impl ArtifactCache {
    pub fn new(
        name: impl Into<String>,
        requested: VersionRequest,
        source: PackageSource,
        registry: Arc<dyn PackageRegistry>,
        installer: Arc<dyn Installer>,
    ) -> Self {
        Self {
            name: name.into(),
            requested,
            resolved: None,
            source,
            registry,
            installer,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requested(&self) -> &VersionRequest {
        &self.requested
    }

    /// Concrete version, once resolved
    pub fn resolved_version(&self) -> Option<&str> {
        self.resolved.as_deref()
    }

    pub fn source(&self) -> &PackageSource {
        &self.source
    }

    /// Pin the requested version to a concrete one.
    ///
    /// Runs at most once; later calls return the pinned version without
    /// touching the registry. Only `update()` moves the pin.
    pub async fn resolve_version(&mut self) -> FishResult<String> {
        if let Some(version) = &self.resolved {
            return Ok(version.clone());
        }

        let version = match &self.requested {
            VersionRequest::Latest => self.fetch_latest().await?,
            VersionRequest::Exact(v) => v.clone(),
        };

        debug!(package = %self.name, requested = %self.requested, resolved = %version, "resolved version");
        self.resolved = Some(version.clone());
        Ok(version)
    }

    async fn fetch_latest(&self) -> FishResult<String> {
        self.registry
            .latest_version(&self.name)
            .await?
            .map(|v| v.to_string())
            .ok_or_else(|| FishError::NoPublishedVersions(self.name.clone()))
    }

    /// Canonical cache directory for the resolved version (cached packages only)
    pub async fn cache_path(&mut self) -> FishResult<Option<PathBuf>> {
        let version = self.resolve_version().await?;
        Ok(match &self.source {
            PackageSource::Cached { store_dir } => {
                Some(CacheLayout::CANONICAL.version_path(store_dir, &self.name, &version))
            }
            PackageSource::Local(_) => None,
        })
    }

    /// Whether the resolved version is physically present
    pub async fn exists(&mut self) -> FishResult<bool> {
        match self.source.clone() {
            PackageSource::Local(path) => Ok(path.exists()),
            PackageSource::Cached { store_dir } => {
                let version = self.resolve_version().await?;
                let found = layout::locate(&store_dir, &self.name, &version);
                debug!(package = %self.name, %version, layout = ?found, "cache lookup");
                Ok(found.is_some())
            }
        }
    }

    /// Install the resolved version into the cache.
    ///
    /// Callers check `exists()` first; local packages are never installed.
    pub async fn install(&mut self) -> FishResult<()> {
        let version = self.resolve_version().await?;
        self.install_version(&version).await
    }

    async fn install_version(&self, version: &str) -> FishResult<()> {
        let PackageSource::Cached { store_dir } = &self.source else {
            debug!(package = %self.name, "local package, skipping install");
            return Ok(());
        };

        std::fs::create_dir_all(store_dir)
            .map_err(|e| FishError::io(format!("creating {}", store_dir.display()), e))?;

        let request = InstallRequest {
            root: CacheLayout::CANONICAL.version_path(store_dir, &self.name, version),
            store_dir: store_dir.clone(),
            registry: self.registry.root().clone(),
            packages: vec![PackageSpec::new(&self.name, version)],
        };

        info!(package = %self.name, %version, "installing package");
        if let Err(e) = self.installer.install(&request).await {
            // A leftover directory would be taken for a cached version
            let entry = CacheLayout::CANONICAL.entry_dir(store_dir, &self.name, version);
            discard_partial_install(&entry);
            return Err(e);
        }
        Ok(())
    }

    /// Re-point to the latest published version, installing it only if it is not cached yet
    pub async fn update(&mut self) -> FishResult<()> {
        let PackageSource::Cached { store_dir } = self.source.clone() else {
            return Ok(());
        };

        let latest = self.fetch_latest().await?;
        if layout::locate(&store_dir, &self.name, &latest).is_none() {
            self.install_version(&latest).await?;
        } else {
            debug!(package = %self.name, version = %latest, "latest version already cached");
        }

        self.resolved = Some(latest);
        Ok(())
    }

    /// Update when cached, install otherwise
    pub async fn ensure_installed(&mut self) -> FishResult<()> {
        if let PackageSource::Local(path) = &self.source {
            if !path.exists() {
                return Err(FishError::ArtifactNotFound {
                    package: self.name.clone(),
                    location: path.clone(),
                });
            }
            return Ok(());
        }

        if self.exists().await? {
            self.update().await
        } else {
            self.install().await
        }
    }

    /// Entry file of the installed package, or `None` if no manifest is found
    pub fn entry_point(&self) -> FishResult<Option<PathBuf>> {
        match &self.source {
            PackageSource::Local(path) => manifest::resolve_entry_point(path, None),
            PackageSource::Cached { store_dir } => {
                let Some(version) = &self.resolved else {
                    return Ok(None);
                };
                let layout = layout::locate(store_dir, &self.name, version)
                    .unwrap_or(CacheLayout::CANONICAL);
                let module_dir = layout.module_dir(store_dir, &self.name, version);
                manifest::resolve_entry_point(&module_dir, Some(store_dir))
            }
        }
    }
}

fn discard_partial_install(entry: &Path) {
    match std::fs::remove_dir_all(entry) {
        Ok(()) => debug!(path = %entry.display(), "removed partial install"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %entry.display(), error = %e, "failed to remove partial install"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use url::Url;

    struct FakeRegistry {
        versions: Vec<String>,
        root: Url,
        queries: Mutex<usize>,
    }

    impl FakeRegistry {
        fn new(versions: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                versions: versions.iter().map(|s| s.to_string()).collect(),
                root: Url::parse("https://registry.example.com").unwrap(),
                queries: Mutex::new(0),
            })
        }

        fn queries(&self) -> usize {
            *self.queries.lock().unwrap()
        }
    }

    #[async_trait]
    impl PackageRegistry for FakeRegistry {
        async fn versions(&self, _name: &str) -> FishResult<Vec<String>> {
            *self.queries.lock().unwrap() += 1;
            Ok(self.versions.clone())
        }

        fn root(&self) -> &Url {
            &self.root
        }
    }

    /// Records requests and materializes the install root like a real installer
    #[derive(Default)]
    struct FakeInstaller {
        calls: Mutex<Vec<InstallRequest>>,
    }

    impl FakeInstaller {
        fn calls(&self) -> Vec<InstallRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Installer for FakeInstaller {
        async fn install(&self, request: &InstallRequest) -> FishResult<()> {
            std::fs::create_dir_all(&request.root).unwrap();
            std::fs::write(
                request.root.join("package.json"),
                r#"{"name":"left-pad","main":"lib/index.js"}"#,
            )
            .unwrap();
            self.calls.lock().unwrap().push(request.clone());
            Ok(())
        }
    }

    fn cache(
        store: &TempDir,
        requested: &str,
        registry: &Arc<FakeRegistry>,
        installer: &Arc<FakeInstaller>,
    ) -> ArtifactCache {
        ArtifactCache::new(
            "left-pad",
            VersionRequest::parse(requested),
            PackageSource::Cached {
                store_dir: store.path().to_path_buf(),
            },
            registry.clone(),
            installer.clone(),
        )
    }

    #[tokio::test]
    async fn test_latest_resolves_once_and_installs() {
        let store = TempDir::new().unwrap();
        let registry = FakeRegistry::new(&["1.0.0", "1.1.0", "1.3.0"]);
        let installer = Arc::new(FakeInstaller::default());
        let mut pkg = cache(&store, "latest", &registry, &installer);

        assert_eq!(pkg.resolve_version().await.unwrap(), "1.3.0");
        assert!(!pkg.exists().await.unwrap());
        pkg.install().await.unwrap();

        assert_eq!(registry.queries(), 1);
        let calls = installer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].packages, vec![PackageSpec::new("left-pad", "1.3.0")]);
        assert!(pkg.exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_exact_version_skips_registry() {
        let store = TempDir::new().unwrap();
        let registry = FakeRegistry::new(&["1.3.0"]);
        let installer = Arc::new(FakeInstaller::default());
        let mut pkg = cache(&store, "1.1.0", &registry, &installer);

        assert_eq!(pkg.resolve_version().await.unwrap(), "1.1.0");
        assert_eq!(registry.queries(), 0);
    }

    #[tokio::test]
    async fn test_latest_without_versions_fails() {
        let store = TempDir::new().unwrap();
        let registry = FakeRegistry::new(&[]);
        let installer = Arc::new(FakeInstaller::default());
        let mut pkg = cache(&store, "latest", &registry, &installer);

        let err = pkg.resolve_version().await.unwrap_err();
        assert!(matches!(err, FishError::NoPublishedVersions(_)));
    }

    #[tokio::test]
    async fn test_exists_recognizes_nested_layout() {
        let store = TempDir::new().unwrap();
        let registry = FakeRegistry::new(&["1.3.0"]);
        let installer = Arc::new(FakeInstaller::default());
        std::fs::create_dir_all(
            CacheLayout::NestedModule.version_path(store.path(), "left-pad", "1.3.0"),
        )
        .unwrap();

        let mut pkg = cache(&store, "latest", &registry, &installer);
        assert!(pkg.exists().await.unwrap());
    }

    #[tokio::test]
    async fn test_update_skips_install_when_latest_cached() {
        let store = TempDir::new().unwrap();
        let registry = FakeRegistry::new(&["1.1.0", "1.3.0"]);
        let installer = Arc::new(FakeInstaller::default());
        std::fs::create_dir_all(CacheLayout::CANONICAL.version_path(store.path(), "left-pad", "1.3.0"))
            .unwrap();

        let mut pkg = cache(&store, "1.1.0", &registry, &installer);
        pkg.update().await.unwrap();

        assert!(installer.calls().is_empty());
        assert_eq!(pkg.resolved_version(), Some("1.3.0"));
    }

    #[tokio::test]
    async fn test_update_installs_missing_latest() {
        let store = TempDir::new().unwrap();
        let registry = FakeRegistry::new(&["1.1.0", "1.3.0"]);
        let installer = Arc::new(FakeInstaller::default());
        std::fs::create_dir_all(CacheLayout::CANONICAL.version_path(store.path(), "left-pad", "1.1.0"))
            .unwrap();

        let mut pkg = cache(&store, "1.1.0", &registry, &installer);
        assert!(pkg.exists().await.unwrap());
        pkg.update().await.unwrap();

        let calls = installer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].packages[0].version, "1.3.0");
        assert_eq!(pkg.resolved_version(), Some("1.3.0"));
        // Superseded version stays cached
        assert!(CacheLayout::CANONICAL
            .version_path(store.path(), "left-pad", "1.1.0")
            .exists());
    }

    /// Leaves a partial install behind, then reports failure like npm would
    struct FailingInstaller;

    #[async_trait]
    impl Installer for FailingInstaller {
        async fn install(&self, request: &InstallRequest) -> FishResult<()> {
            std::fs::create_dir_all(request.root.join("node_modules")).unwrap();
            Err(FishError::InstallFailed {
                package: request.packages[0].spec(),
                code: Some(1),
                stderr: "npm error code ECONNREFUSED".into(),
            })
        }
    }

    #[tokio::test]
    async fn test_failed_install_leaves_cache_unchanged() {
        let store = TempDir::new().unwrap();
        let registry = FakeRegistry::new(&["1.3.0"]);
        let mut pkg = ArtifactCache::new(
            "@fish-cli-dev/init",
            VersionRequest::Latest,
            PackageSource::Cached {
                store_dir: store.path().to_path_buf(),
            },
            registry.clone(),
            Arc::new(FailingInstaller),
        );

        let err = pkg.ensure_installed().await.unwrap_err();
        assert!(matches!(err, FishError::InstallFailed { .. }));
        assert!(!pkg.exists().await.unwrap());
        assert_eq!(std::fs::read_dir(store.path()).unwrap().count(), 0);

        // The next run installs again instead of trusting an empty directory
        let installer = Arc::new(FakeInstaller::default());
        let mut retry = ArtifactCache::new(
            "@fish-cli-dev/init",
            VersionRequest::Latest,
            PackageSource::Cached {
                store_dir: store.path().to_path_buf(),
            },
            registry,
            installer.clone(),
        );
        retry.ensure_installed().await.unwrap();
        assert_eq!(installer.calls().len(), 1);
        assert!(retry.entry_point().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_entry_point_after_install() {
        let store = TempDir::new().unwrap();
        let registry = FakeRegistry::new(&["1.3.0"]);
        let installer = Arc::new(FakeInstaller::default());
        let mut pkg = cache(&store, "latest", &registry, &installer);

        assert!(pkg.entry_point().unwrap().is_none());
        pkg.ensure_installed().await.unwrap();

        let entry = pkg.entry_point().unwrap().unwrap();
        assert!(entry.ends_with("lib/index.js"));
        assert!(entry.starts_with(store.path()));
    }

    #[tokio::test]
    async fn test_local_source_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let registry = FakeRegistry::new(&["1.3.0"]);
        let installer = Arc::new(FakeInstaller::default());
        let mut pkg = ArtifactCache::new(
            "left-pad",
            VersionRequest::Latest,
            PackageSource::Local(tmp.path().join("missing")),
            registry.clone(),
            installer.clone(),
        );

        let err = pkg.ensure_installed().await.unwrap_err();
        assert!(matches!(err, FishError::ArtifactNotFound { .. }));
        assert!(installer.calls().is_empty());
        assert_eq!(registry.queries(), 0);
    }
}
