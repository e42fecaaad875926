//! Project name discovery from Pulumi.yaml

use std::fs;
use std::path::{Path, PathBuf};

/// Path to the project marker file for a working directory.
#[must_use]
pub fn project_file(cwd: &Path) -> PathBuf {
    cwd.join("Pulumi.yaml")
}

/// Extract the `name:` field from `<cwd>/Pulumi.yaml`.
///
/// A line-based scan, deliberately not a YAML parser: the first trimmed line
/// starting with `name:` wins. Returns `None` when the file is missing, the
/// field is absent, or its value is empty.
#[must_use]
pub fn read_project_name(cwd: &Path) -> Option<String> {
    let raw = fs::read_to_string(project_file(cwd)).ok()?;
    raw.lines()
        .find_map(|line| line.trim().strip_prefix("name:"))
        .map(|value| value.trim().to_string())
        .filter(|name| !name.is_empty())
}
