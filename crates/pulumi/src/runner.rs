//! Subprocess invocation of the Pulumi CLI
//!
//! [`CommandRunner`] is the narrow capability boundary between data
//! acquisition and the outside world: everything above it can be exercised in
//! tests with a stub instead of a spawned process.

use crate::{Error, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Hard deadline for a single CLI invocation.
pub const COMMAND_TIMEOUT_SECONDS: u64 = 10;

/// Runs one external query and returns its stdout.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Invoke the external tool with `args` against `cwd`.
    ///
    /// Timeout, spawn failure, and non-zero exit are all errors; callers
    /// decide whether a failed query is fatal or a degradation.
    async fn run(&self, args: &[&str], cwd: &Path) -> Result<String>;
}

/// Production runner that spawns the `pulumi` binary.
///
/// The working directory is always passed via `--cwd` rather than inherited,
/// so the query is correct regardless of where the statusline process itself
/// was started.
#[derive(Debug, Clone, Copy, Default)]
pub struct PulumiCli;

#[async_trait]
impl CommandRunner for PulumiCli {
    async fn run(&self, args: &[&str], cwd: &Path) -> Result<String> {
        let label = args.join(" ");
        debug!(command = %label, cwd = %cwd.display(), "running pulumi");

        let mut cmd = Command::new("pulumi");
        cmd.args(args)
            .arg("--cwd")
            .arg(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let deadline = Duration::from_secs(COMMAND_TIMEOUT_SECONDS);
        match timeout(deadline, cmd.output()).await {
            Ok(Ok(output)) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(Ok(output)) => Err(Error::command(
                label,
                format!("exited with status {}", output.status),
            )),
            Ok(Err(e)) => Err(Error::command(label, format!("failed to spawn: {e}"))),
            Err(_) => Err(Error::timeout(label, COMMAND_TIMEOUT_SECONDS)),
        }
    }
}
