//! Package manifest (package.json) lookup and entry point resolution

use crate::error::{FishError, FishResult};
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};

/// Manifest file name searched for when locating a package root
pub const MANIFEST_FILE: &str = "package.json";

/// Entry file used when the manifest declares no `main`
pub const DEFAULT_ENTRY: &str = "index.js";

/// The subset of package.json fields this tool reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    /// Declared main entry, relative to the package root
    #[serde(default)]
    pub main: Option<String>,
}

impl PackageManifest {
    /// Read and parse `dir/package.json`
    pub fn read(dir: &Path) -> FishResult<Self> {
        let path = dir.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| FishError::io(format!("reading {}", path.display()), e))?;
        serde_json::from_str(&content).map_err(|e| FishError::Manifest {
            path,
            reason: e.to_string(),
        })
    }
}

/// Nearest directory at or above `start` containing a manifest.
///
/// With a `boundary`, the search never leaves that directory.
pub fn find_package_root(start: &Path, boundary: Option<&Path>) -> Option<PathBuf> {
    start
        .ancestors()
        .take_while(|dir| boundary.map_or(true, |b| dir.starts_with(b)))
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
        .map(Path::to_path_buf)
}

/// Resolve the entry file of the package enclosing `start`.
///
/// Returns `Ok(None)` when no manifest is found; a manifest that exists but
/// cannot be parsed is an error.
pub fn resolve_entry_point(start: &Path, boundary: Option<&Path>) -> FishResult<Option<PathBuf>> {
    let Some(root) = find_package_root(start, boundary) else {
        return Ok(None);
    };

    let manifest = PackageManifest::read(&root)?;
    let entry = manifest
        .main
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_ENTRY.to_string());

    Ok(Some(normalize(&root.join(entry))))
}

/// Lexically normalize a path, dropping `.` and folding `..`
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Render a path with forward slashes regardless of platform
pub fn to_portable(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
