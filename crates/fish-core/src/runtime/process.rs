//! Child process execution with explicit exit codes

use crate::error::{FishError, FishResult};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command as TokioCommand;
use tracing::debug;

/// Exit code reported when a child ends without one (killed by a signal)
const SIGNALED_EXIT_CODE: i32 = 1;

/// Options for a child process
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Working directory; inherits the parent's when `None`
    pub cwd: Option<PathBuf>,
}

/// Launches child processes and reports how they ended
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run to completion with inherited stdio and return the exit code
    async fn run(&self, program: &str, args: &[String], options: &RunOptions) -> FishResult<i32>;
}

/// Runner backed by `tokio::process`
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    /// Windows resolves `node`/`npm` shims only through the shell
    fn command(program: &str, args: &[String]) -> TokioCommand {
        if cfg!(windows) {
            let mut cmd = TokioCommand::new("cmd");
            cmd.arg("/c").arg(program).args(args);
            cmd
        } else {
            let mut cmd = TokioCommand::new(program);
            cmd.args(args);
            cmd
        }
    }
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, program: &str, args: &[String], options: &RunOptions) -> FishResult<i32> {
        let mut cmd = Self::command(program, args);
        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = cmd.spawn().map_err(|e| FishError::process(program, e))?;
        let status = child
            .wait()
            .await
            .map_err(|e| FishError::process(program, e))?;

        let code = status.code().unwrap_or(SIGNALED_EXIT_CODE);
        debug!(program, code, "child exited");
        Ok(code)
    }
}
