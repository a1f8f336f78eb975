//! Node.js runtime detection

use crate::error::{FishError, FishResult};
use crate::registry::parse_version;
use semver::Version;
use std::process::Command;

/// Oldest Node.js able to run template entry points
pub const LOWEST_NODE_VERSION: &str = "12.0.0";

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    let output = Command::new("node").arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name: "Node.js",
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name: "Node.js",
            version: None,
            available: false,
        },
    }
}

/// Fail unless the detected runtime is at least `lowest`
pub fn require_version(info: &RuntimeInfo, lowest: &str) -> FishResult<Version> {
    let Some(raw) = info.version.as_deref().filter(|_| info.available) else {
        return Err(FishError::RuntimeMissing(format!(
            "{} {} or newer is required",
            info.name, lowest
        )));
    };

    let current = parse_version(raw)?;
    let lowest = parse_version(lowest)?;
    if current < lowest {
        return Err(FishError::RuntimeMissing(format!(
            "{} {} or newer is required, found {}",
            info.name, lowest, current
        )));
    }

    Ok(current)
}

/// Detect Node.js and enforce the minimum version
pub fn require_node() -> FishResult<Version> {
    require_version(&check_node(), LOWEST_NODE_VERSION)
}
