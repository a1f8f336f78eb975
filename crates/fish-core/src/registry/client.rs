//! Package registry client
//!
//! Queries `{registry}/{package}` and reads the keys of the `versions` object.
//! Results are never cached: the registry is the source of truth and may
//! change between calls.

use super::version;
use crate::config::RegistryRoot;
use crate::error::{FishError, FishResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use semver::Version;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;
use url::Url;

/// Read-only view of a package registry
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// All published version strings of a package. Unknown packages yield an empty set.
    async fn versions(&self, name: &str) -> FishResult<Vec<String>>;

    /// Highest published version, or `None` if nothing is published
    async fn latest_version(&self, name: &str) -> FishResult<Option<Version>> {
        let versions = self.versions(name).await?;
        Ok(version::latest(&versions))
    }

    /// Highest published version newer than (and compatible with) `base`
    async fn newer_compatible_version(
        &self,
        base: &str,
        name: &str,
    ) -> FishResult<Option<Version>> {
        let versions = self.versions(name).await?;
        version::newer_compatible(base, &versions)
    }

    /// Registry root URL handed to installers
    fn root(&self) -> &Url;
}

/// Package document as served by npm-compatible registries (only the fields we read)
#[derive(Debug, Deserialize)]
struct PackageDocument {
    #[serde(default)]
    versions: BTreeMap<String, serde_json::Value>,
}

/// HTTP registry client
pub struct RegistryClient {
    root: Url,
    client: reqwest::Client,
}

impl RegistryClient {
    /// Create a new client with a custom user agent
    pub fn new(root: Url, user_agent: &str) -> Self {
        Self {
            root,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    pub fn from_root(root: &RegistryRoot, user_agent: &str) -> Self {
        Self::new(root.url(), user_agent)
    }

    /// Build the package document URL. Scoped names stay a single path segment.
    fn package_url(&self, name: &str) -> FishResult<Url> {
        let mut url = self.root.clone();
        url.path_segments_mut()
            .map_err(|_| FishError::registry(name, format!("registry URL cannot be a base: {}", self.root)))?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }
}

#[async_trait]
impl PackageRegistry for RegistryClient {
    async fn versions(&self, name: &str) -> FishResult<Vec<String>> {
        let url = self.package_url(name)?;
        debug!(%url, "querying registry");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FishError::registry(name, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(package = name, "package not found in registry");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            return Err(FishError::registry(name, format!("HTTP {} from {}", status, url)));
        }

        let document: PackageDocument = response
            .json()
            .await
            .map_err(|e| FishError::registry(name, format!("invalid package document: {}", e)))?;

        Ok(document.versions.into_keys().collect())
    }

    fn root(&self) -> &Url {
        &self.root
    }
}
