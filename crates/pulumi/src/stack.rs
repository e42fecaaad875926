//! Stack list and history queries against the Pulumi CLI

use crate::runner::CommandRunner;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// One entry from `pulumi stack ls --json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackListEntry {
    /// Stack name, possibly fully qualified (`org/project/stack`)
    pub name: String,
    /// RFC3339 timestamp of the last update, if any
    #[serde(default)]
    pub last_update: Option<String>,
    /// Console URL (unused)
    #[serde(default)]
    pub url: Option<String>,
    /// Number of resources in the stack
    #[serde(default)]
    pub resource_count: u64,
    /// Whether this is the currently selected stack
    #[serde(default)]
    pub current: bool,
    /// Whether an update is in flight (unused)
    #[serde(default)]
    pub update_in_progress: bool,
}

/// One entry from `pulumi stack history --json`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    /// Result of the operation (e.g., "succeeded", "failed")
    #[serde(default)]
    pub result: String,
}

/// The fields of a snapshot that come from the primary query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackInfo {
    /// Short display name of the selected stack
    pub stack_name: String,
    /// Number of resources in the stack
    pub resource_count: u64,
    /// Timestamp of the last update, when present and parseable
    pub last_update: Option<DateTime<Utc>>,
}

/// Short display name from a potentially fully-qualified stack name.
///
/// Slash-delimited, last segment wins: `myorg/myproject/production` becomes
/// `production`.
#[must_use]
pub fn extract_stack_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Primary query: `pulumi stack ls --json`.
///
/// Returns `Ok(None)` when no stack is flagged as current. CLI failure or
/// malformed output is an error; the caller renders "no stack selected" and
/// caches nothing, so the next invocation retries.
pub async fn fetch_stack_info(
    runner: &dyn CommandRunner,
    cwd: &Path,
) -> Result<Option<StackInfo>> {
    let out = runner.run(&["stack", "ls", "--json"], cwd).await?;
    let entries: Vec<StackListEntry> = serde_json::from_str(&out)
        .map_err(|e| Error::malformed(format!("stack ls output: {e}")))?;

    let Some(entry) = entries.into_iter().find(|entry| entry.current) else {
        return Ok(None);
    };

    // A last-update value that fails strict RFC3339 parsing degrades to
    // "no recorded update" instead of failing the whole acquisition.
    let last_update = entry.last_update.as_deref().and_then(|raw| {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(t) => Some(t.with_timezone(&Utc)),
            Err(e) => {
                debug!(raw, "unparseable lastUpdate: {e}");
                None
            }
        }
    });

    Ok(Some(StackInfo {
        stack_name: extract_stack_name(&entry.name).to_string(),
        resource_count: entry.resource_count,
        last_update,
    }))
}

/// Secondary query: `pulumi stack history --json --page-size 1`.
///
/// Returns the most recent operation's result token verbatim, or `None` when
/// there is no history. Failures here are the caller's to degrade; history is
/// supplementary, not load-bearing.
pub async fn fetch_last_status(
    runner: &dyn CommandRunner,
    cwd: &Path,
) -> Result<Option<String>> {
    let out = runner
        .run(&["stack", "history", "--json", "--page-size", "1"], cwd)
        .await?;
    let entries: Vec<HistoryEntry> = serde_json::from_str(&out)
        .map_err(|e| Error::malformed(format!("stack history output: {e}")))?;

    Ok(entries
        .into_iter()
        .next()
        .map(|entry| entry.result)
        .filter(|result| !result.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::CommandRunner;
    use async_trait::async_trait;

    /// Stub runner returning canned output per subcommand.
    struct StubRunner {
        stack_ls: Result<String>,
        history: Result<String>,
    }

    impl StubRunner {
        fn new(stack_ls: Result<String>, history: Result<String>) -> Self {
            Self { stack_ls, history }
        }
    }

    #[async_trait]
    impl CommandRunner for StubRunner {
        async fn run(&self, args: &[&str], _cwd: &Path) -> Result<String> {
            let canned = if args.get(1) == Some(&"ls") {
                &self.stack_ls
            } else {
                &self.history
            };
            match canned {
                Ok(out) => Ok(out.clone()),
                Err(_) => Err(Error::command(args.join(" "), "stubbed failure")),
            }
        }
    }

    fn ls_json() -> String {
        r#"[
            {"name": "myorg/myproject/dev", "lastUpdate": "2026-08-01T12:00:00Z",
             "url": "https://app.pulumi.com/myorg/myproject/dev",
             "resourceCount": 42, "current": false, "updateInProgress": false},
            {"name": "myorg/myproject/production", "lastUpdate": "2026-08-20T08:30:00Z",
             "url": "https://app.pulumi.com/myorg/myproject/production",
             "resourceCount": 7, "current": true, "updateInProgress": false}
        ]"#
        .to_string()
    }

    // ==========================================================================
    // extract_stack_name tests
    // ==========================================================================

    #[test]
    fn bare_name_passes_through() {
        assert_eq!(extract_stack_name("dev"), "dev");
    }

    #[test]
    fn org_qualified_name_keeps_last_segment() {
        assert_eq!(extract_stack_name("myorg/dev"), "dev");
    }

    #[test]
    fn fully_qualified_name_keeps_last_segment() {
        assert_eq!(
            extract_stack_name("myorg/myproject/production"),
            "production"
        );
    }

    // ==========================================================================
    // fetch_stack_info tests
    // ==========================================================================

    #[tokio::test]
    async fn picks_the_current_stack() {
        let runner = StubRunner::new(Ok(ls_json()), Ok("[]".to_string()));

        let info = fetch_stack_info(&runner, Path::new("/p")).await.unwrap();
        let info = info.unwrap();
        assert_eq!(info.stack_name, "production");
        assert_eq!(info.resource_count, 7);
        assert_eq!(
            info.last_update,
            Some("2026-08-20T08:30:00Z".parse().unwrap())
        );
    }

    #[tokio::test]
    async fn no_current_stack_yields_none() {
        let json = r#"[{"name": "dev", "resourceCount": 3, "current": false}]"#;
        let runner = StubRunner::new(Ok(json.to_string()), Ok("[]".to_string()));

        let info = fetch_stack_info(&runner, Path::new("/p")).await.unwrap();
        assert!(info.is_none());
    }

    #[tokio::test]
    async fn empty_list_yields_none() {
        let runner = StubRunner::new(Ok("[]".to_string()), Ok("[]".to_string()));

        let info = fetch_stack_info(&runner, Path::new("/p")).await.unwrap();
        assert!(info.is_none());
    }

    #[tokio::test]
    async fn malformed_list_is_an_error() {
        let runner = StubRunner::new(Ok("not json".to_string()), Ok("[]".to_string()));

        assert!(fetch_stack_info(&runner, Path::new("/p")).await.is_err());
    }

    #[tokio::test]
    async fn cli_failure_is_an_error() {
        let runner = StubRunner::new(
            Err(Error::command("stack ls", "boom")),
            Ok("[]".to_string()),
        );

        assert!(fetch_stack_info(&runner, Path::new("/p")).await.is_err());
    }

    #[tokio::test]
    async fn bad_timestamp_degrades_to_no_update() {
        let json = r#"[{"name": "dev", "lastUpdate": "yesterday-ish",
                        "resourceCount": 1, "current": true}]"#;
        let runner = StubRunner::new(Ok(json.to_string()), Ok("[]".to_string()));

        let info = fetch_stack_info(&runner, Path::new("/p"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.stack_name, "dev");
        assert!(info.last_update.is_none());
    }

    #[tokio::test]
    async fn missing_optional_fields_default() {
        let json = r#"[{"name": "dev", "current": true}]"#;
        let runner = StubRunner::new(Ok(json.to_string()), Ok("[]".to_string()));

        let info = fetch_stack_info(&runner, Path::new("/p"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(info.resource_count, 0);
        assert!(info.last_update.is_none());
    }

    // ==========================================================================
    // fetch_last_status tests
    // ==========================================================================

    #[tokio::test]
    async fn first_history_entry_wins() {
        let history = r#"[{"result": "succeeded"}, {"result": "failed"}]"#;
        let runner = StubRunner::new(Ok("[]".to_string()), Ok(history.to_string()));

        let status = fetch_last_status(&runner, Path::new("/p")).await.unwrap();
        assert_eq!(status, Some("succeeded".to_string()));
    }

    #[tokio::test]
    async fn unknown_status_token_passes_through() {
        let history = r#"[{"result": "in-progress"}]"#;
        let runner = StubRunner::new(Ok("[]".to_string()), Ok(history.to_string()));

        let status = fetch_last_status(&runner, Path::new("/p")).await.unwrap();
        assert_eq!(status, Some("in-progress".to_string()));
    }

    #[tokio::test]
    async fn empty_history_yields_none() {
        let runner = StubRunner::new(Ok("[]".to_string()), Ok("[]".to_string()));

        let status = fetch_last_status(&runner, Path::new("/p")).await.unwrap();
        assert!(status.is_none());
    }

    #[tokio::test]
    async fn malformed_history_is_an_error() {
        let runner = StubRunner::new(Ok("[]".to_string()), Ok("{oops".to_string()));

        assert!(fetch_last_status(&runner, Path::new("/p")).await.is_err());
    }
}
