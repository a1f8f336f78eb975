//! Package registry access
//!
//! This module provides:
//! - `PackageRegistry`, the read-only registry interface
//! - `RegistryClient`, its HTTP implementation for npm-compatible registries
//! - Semver helpers for picking the latest or a newer compatible version

pub mod client;
pub mod version;

pub use client::{PackageRegistry, RegistryClient};
pub use version::{parse_version, update_advisory};
