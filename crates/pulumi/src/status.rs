//! Refresh orchestration: cache hit, or acquire and persist
//!
//! [`StatusFetcher::get_snapshot`] is the sole entry point. Per invocation:
//! fingerprint, cache read, and on a miss the two CLI queries, a best-effort
//! write, and the assembled snapshot. No state survives the call; the cache
//! file is the only thing shared between invocations.

use crate::project::read_project_name;
use crate::runner::{CommandRunner, PulumiCli};
use crate::stack::{fetch_last_status, fetch_stack_info};
use crate::workspace::selection_fingerprint;
use chrono::Utc;
use statusline_cache as cache;
use statusline_cache::Snapshot;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Decides whether to trust the cached snapshot or refresh from the CLI.
#[derive(Debug)]
pub struct StatusFetcher<R: CommandRunner> {
    runner: R,
    cache_root: Option<PathBuf>,
    workspaces_dir: Option<PathBuf>,
}

impl Default for StatusFetcher<PulumiCli> {
    fn default() -> Self {
        Self::with_runner(PulumiCli)
    }
}

impl StatusFetcher<PulumiCli> {
    /// Fetcher backed by the real `pulumi` binary and default directories.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: CommandRunner> StatusFetcher<R> {
    /// Fetcher with a custom runner (tests substitute a stub here).
    #[must_use]
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            cache_root: None,
            workspaces_dir: None,
        }
    }

    /// Override the cache directory (defaults to the system temp dir).
    #[must_use]
    pub fn cache_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cache_root = Some(root.into());
        self
    }

    /// Override the Pulumi workspace-state directory (defaults to
    /// `~/.pulumi/workspaces`).
    #[must_use]
    pub fn workspaces_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workspaces_dir = Some(dir.into());
        self
    }

    /// Current snapshot for a working directory, from cache or refreshed.
    ///
    /// `None` means "no stack selected": the primary query failed or found no
    /// current stack. Negative results are never cached, so the next
    /// invocation retries instead of pinning the miss for a TTL.
    pub async fn get_snapshot(&self, cwd: &Path) -> Option<Snapshot> {
        let key = cwd.to_string_lossy();
        let fingerprint = selection_fingerprint(cwd, self.workspaces_dir.as_deref());

        if let Some(cached) = cache::read(&key, fingerprint, self.cache_root.as_deref()) {
            debug!(cwd = %cwd.display(), "snapshot cache hit");
            return Some(cached);
        }

        let info = match fetch_stack_info(&self.runner, cwd).await {
            Ok(Some(info)) => info,
            Ok(None) => {
                debug!(cwd = %cwd.display(), "no stack selected");
                return None;
            }
            Err(e) => {
                warn!(cwd = %cwd.display(), "stack list query failed: {e}");
                return None;
            }
        };

        let last_status = match fetch_last_status(&self.runner, cwd).await {
            Ok(status) => status,
            Err(e) => {
                // History is supplementary; the snapshot is still valid and
                // cacheable without it.
                debug!(cwd = %cwd.display(), "history query degraded: {e}");
                None
            }
        };

        let snapshot = Snapshot {
            stack_name: info.stack_name,
            project_name: read_project_name(cwd),
            resource_count: info.resource_count,
            last_status,
            last_update: info.last_update,
            fetched_at: Utc::now(),
            fingerprint,
        };
        cache::write(&key, &snapshot, self.cache_root.as_deref());
        Some(snapshot)
    }
}
