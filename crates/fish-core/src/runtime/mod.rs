//! Runtime detection and child process execution
//!
//! This module provides:
//! - Node.js detection with a minimum version check
//! - `ProcessRunner`, the seam used to launch template entry points

pub mod check;
pub mod process;

pub use check::{check_node, require_node, RuntimeInfo, LOWEST_NODE_VERSION};
pub use process::{ProcessRunner, RunOptions, TokioProcessRunner};
