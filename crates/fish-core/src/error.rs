//! Error types for fish-core
//!
//! All modules return `FishResult<T>`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fish-core operations
pub type FishResult<T> = Result<T, FishError>;

/// All errors that can occur while resolving packages or publishing a project
#[derive(Error, Debug)]
pub enum FishError {
    // Configuration errors
    #[error("Failed to prepare configuration directory {path}: {reason}")]
    Configuration { path: PathBuf, reason: String },

    // Registry errors
    #[error("Registry unavailable while querying {package}: {reason}")]
    RegistryUnavailable { package: String, reason: String },

    #[error("No published versions found for {0}")]
    NoPublishedVersions(String),

    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    // Package cache errors
    #[error("Package {package} not found at {location}")]
    ArtifactNotFound { package: String, location: PathBuf },

    #[error("Invalid package manifest {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },

    #[error("Installing {package} failed{}: {stderr}", .code.map(|c| format!(" (exit code {c})")).unwrap_or_default())]
    InstallFailed {
        package: String,
        code: Option<i32>,
        stderr: String,
    },

    // Hosting errors
    #[error("Unsupported hosting provider: {0}")]
    UnsupportedProvider(String),

    #[error("{provider} request failed{}: {detail}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    HostingUnavailable {
        provider: String,
        status: Option<u16>,
        detail: String,
    },

    #[error("{provider} rejected the credentials: {detail}")]
    AuthenticationInvalid { provider: String, detail: String },

    #[error("Cannot determine repository owner: {0}")]
    OwnershipAmbiguous(String),

    #[error("Failed to create remote repository {owner}/{name}: {reason}")]
    RepositoryCreationFailed {
        owner: String,
        name: String,
        reason: String,
    },

    // Working tree errors
    #[error("Working tree has unresolved conflicts: {}", .paths.join(", "))]
    WorkingTreeConflict { paths: Vec<String> },

    #[error("git {command} failed: {stderr}")]
    VersionControl { command: String, stderr: String },

    // Process errors
    #[error("Failed to run {command}")]
    Process {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Required runtime unavailable: {0}")]
    RuntimeMissing(String),

    // Interactive prompt errors
    #[error("Prompt failed")]
    Prompt(#[source] std::io::Error),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl FishError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a process spawn error
    pub fn process(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::Process {
            command: command.into(),
            source,
        }
    }

    /// Create a registry error for a package
    pub fn registry(package: impl Into<String>, reason: impl ToString) -> Self {
        Self::RegistryUnavailable {
            package: package.into(),
            reason: reason.to_string(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::AuthenticationInvalid { .. } => Some("Run: fish publish --refresh-token"),
            Self::OwnershipAmbiguous(_) => Some("Run: fish publish --refresh-owner"),
            // The saved token belongs to the previous provider
            Self::UnsupportedProvider(_) => {
                Some("Run: fish publish --refresh-server --refresh-token")
            }
            Self::WorkingTreeConflict { .. } => {
                Some("Resolve the conflicts and commit them manually, then run publish again")
            }
            Self::RegistryUnavailable { .. } => {
                Some("Check your network or retry with --original-registry")
            }
            Self::RuntimeMissing(_) => Some("Install Node.js 12 or newer from https://nodejs.org"),
            _ => None,
        }
    }
}
