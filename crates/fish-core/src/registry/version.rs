//! Semantic version selection over published version sets

use crate::error::{FishError, FishResult};
use semver::{Version, VersionReq};

/// Parse version string, tolerating a leading 'v'
pub fn parse_version(version_str: &str) -> FishResult<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).map_err(|e| FishError::InvalidVersion {
        version: version_str.to_string(),
        reason: e.to_string(),
    })
}

/// Parse every version string, skipping the ones that are not valid semver
fn parsed(versions: &[String]) -> impl Iterator<Item = Version> + '_ {
    versions.iter().filter_map(|v| parse_version(v).ok())
}

/// Highest version under semver ordering
pub fn latest(versions: &[String]) -> Option<Version> {
    parsed(versions).max()
}

/// Highest version that is newer than `base` and caret-compatible with it
pub fn newer_compatible(base: &str, versions: &[String]) -> FishResult<Option<Version>> {
    let base = parse_version(base)?;
    let req = VersionReq::parse(&format!("^{}", base)).map_err(|e| FishError::InvalidVersion {
        version: base.to_string(),
        reason: e.to_string(),
    })?;

    Ok(parsed(versions)
        .filter(|v| *v > base && req.matches(v))
        .max())
}

/// Build the advisory shown when a newer release of the CLI exists
pub fn update_advisory(
    package: &str,
    current: &str,
    newer: &Version,
    upgrade_command: &str,
) -> String {
    format!(
        "A newer version of {} is available: {} (current {}).\n\
         Update with: {}",
        package, newer, current, upgrade_command
    )
}
