//! On-disk layout of the package cache
//!
//! Installs are always written to the hashed-prefix layout. The nested-module
//! layout left behind by older installers is still recognized when checking
//! for a cached version, but nothing writes to it anymore.

use std::path::{Path, PathBuf};

/// Directory used by the nested-module layout for versioned copies
const NESTED_STORE: &str = ".store";

/// Physical layout of a cached package version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLayout {
    /// `{store}/_{sanitized}@{version}@{name}`
    HashedPrefix,
    /// `{store}/.store/{name}@{version}`, module linked at `{store}/{name}`
    NestedModule,
}

impl CacheLayout {
    /// Layout used for every new install
    pub const CANONICAL: CacheLayout = CacheLayout::HashedPrefix;

    /// Lookup order when checking whether a version is cached
    const LOOKUP_ORDER: [CacheLayout; 2] = [CacheLayout::HashedPrefix, CacheLayout::NestedModule];

    /// Path that marks `name@version` as cached under this layout
    pub fn version_path(self, store: &Path, name: &str, version: &str) -> PathBuf {
        match self {
            CacheLayout::HashedPrefix => {
                store.join(format!("_{}@{}@{}", sanitize(name), version, name))
            }
            CacheLayout::NestedModule => store
                .join(NESTED_STORE)
                .join(format!("{}@{}", name, version)),
        }
    }

    /// Top-level directory under `store` created for `name@version`.
    ///
    /// Scoped names nest the version path one level deeper, so this is the
    /// directory to remove when discarding an install.
    pub fn entry_dir(self, store: &Path, name: &str, version: &str) -> PathBuf {
        let path = self.version_path(store, name, version);
        match path.strip_prefix(store).ok().and_then(|rel| rel.components().next()) {
            Some(first) => store.join(first),
            None => path,
        }
    }

    /// Directory holding the package's own files
    pub fn module_dir(self, store: &Path, name: &str, version: &str) -> PathBuf {
        match self {
            CacheLayout::HashedPrefix => {
                let root = self.version_path(store, name, version);
                // npm-style installers nest the package under node_modules
                let nested = root.join("node_modules").join(name);
                if nested.is_dir() {
                    nested
                } else {
                    root
                }
            }
            CacheLayout::NestedModule => store.join(name),
        }
    }
}

/// Replace path separators in a package name so it forms a single path component
pub fn sanitize(name: &str) -> String {
    name.replace('/', "_")
}

/// Find the layout under which `name@version` is physically present, canonical first
pub fn locate(store: &Path, name: &str, version: &str) -> Option<CacheLayout> {
    CacheLayout::LOOKUP_ORDER
        .into_iter()
        .find(|layout| layout.version_path(store, name, version).exists())
}
