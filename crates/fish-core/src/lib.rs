//! Fish Core - Template package cache and repository publishing
//!
//! This library backs the `fish` CLI. Dynamic commands such as `init` are
//! implemented by template packages published to an npm-compatible registry;
//! fish-core resolves, caches and runs them. It also bootstraps publishing a
//! local project to a hosting provider (GitHub or Gitee).
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Registry queries, the versioned package cache,
//!   hosting provider clients, the credential store, git and process adapters
//! - **Layer 2: Workflow Orchestration** - `Executor` for dynamic commands and
//!   `PublishWorkflow`, both driven through collaborator traits
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use fish_core::{ArtifactCache, PackageSource, RegistryClient, VersionRequest};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(RegistryClient::from_root(&config.registry, "my-tool"));
//! let mut package = ArtifactCache::new(
//!     "@fish-cli-dev/init",
//!     VersionRequest::Latest,
//!     PackageSource::Cached { store_dir: config.store_dir() },
//!     registry,
//!     Arc::new(NpmInstaller),
//! );
//! package.ensure_installed().await?;
//! let entry = package.entry_point()?;
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod exec;
pub mod hosting;
pub mod package;
pub mod product;
pub mod prompt;
pub mod publish;
pub mod registry;
pub mod runtime;
pub mod vcs;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use config::{CliConfig, RegistryRoot};
pub use credentials::{CredentialKey, CredentialStore};
pub use error::{FishError, FishResult};
pub use exec::{Executor, PreparedPackage};
pub use hosting::{HostingProvider, HttpProviderFactory, ProviderFactory, ProviderKind};
pub use package::{ArtifactCache, Installer, NpmInstaller, PackageSource, VersionRequest};
pub use product::ProductConfig;
pub use prompt::{Choice, Prompter};
pub use publish::{ProjectInfo, PublishOptions, PublishOutcome, PublishWorkflow};
pub use registry::{PackageRegistry, RegistryClient};
pub use runtime::{ProcessRunner, TokioProcessRunner};
pub use vcs::{GitCli, VersionControl};

#[cfg(feature = "tui")]
pub use tui::{run_command, run_publish, ClackPrompter};
