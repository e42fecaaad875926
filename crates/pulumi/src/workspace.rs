//! Selection fingerprinting from Pulumi's workspace-state directory
//!
//! Pulumi records the currently selected stack in
//! `~/.pulumi/workspaces/<project>-<hash>-workspace.json` and rewrites that
//! file on every `pulumi stack select` / `rm`. Its mtime therefore changes
//! exactly when the selection changes, which makes it a free cache-busting
//! signal without re-deriving Pulumi's internal addressing scheme.
//!
//! Everything here is best-effort: any failure degrades to
//! [`Fingerprint::NEUTRAL`], which only costs an extra refresh, never wrong
//! data, because acquisition always re-derives ground truth.

use crate::project::read_project_name;
use statusline_cache::Fingerprint;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default workspace-state directory, `~/.pulumi/workspaces`.
#[must_use]
pub fn default_workspaces_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pulumi").join("workspaces"))
}

/// Fingerprint of the current stack selection for a working directory.
///
/// Mtime (nanosecond resolution) of the first workspace file whose name
/// matches the project declared in `<cwd>/Pulumi.yaml`. `workspaces_dir`
/// overrides the default directory in tests. Read-only; never spawns a
/// process.
#[must_use]
pub fn selection_fingerprint(cwd: &Path, workspaces_dir: Option<&Path>) -> Fingerprint {
    let Some(project) = read_project_name(cwd) else {
        return Fingerprint::NEUTRAL;
    };
    let dir = match workspaces_dir {
        Some(dir) => dir.to_path_buf(),
        None => match default_workspaces_dir() {
            Some(dir) => dir,
            None => return Fingerprint::NEUTRAL,
        },
    };

    match first_workspace_match(&dir, &project).and_then(|path| mtime_nanos(&path)) {
        Some(nanos) => Fingerprint::from(nanos),
        None => {
            debug!(project, dir = %dir.display(), "no workspace file; neutral fingerprint");
            Fingerprint::NEUTRAL
        }
    }
}

/// First (alphabetical) workspace file for a project.
///
/// Multiple matches are possible when a project name is a prefix of another;
/// picking the first is a known approximation carried over deliberately.
fn first_workspace_match(dir: &Path, project: &str) -> Option<PathBuf> {
    let pattern = dir.join(format!("{project}-*-workspace.json"));
    glob::glob(pattern.to_str()?).ok()?.find_map(std::result::Result::ok)
}

fn mtime_nanos(path: &Path) -> Option<i64> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    let since_epoch = modified.duration_since(std::time::UNIX_EPOCH).ok()?;
    i64::try_from(since_epoch.as_nanos()).ok()
}
