//! Stdin envelope from the host UI
//!
//! Claude Code pipes a JSON document to the status line on every prompt
//! render. Only the working directory matters here: `cwd` at the top level,
//! with `workspace.current_dir` as a nested fallback. Anything unparseable
//! resolves to "no directory" and the tool prints nothing.

use serde::Deserialize;

/// Relevant fields of the host's stdin JSON.
#[derive(Debug, Default, Deserialize)]
pub struct StdinEnvelope {
    /// Primary working-directory field
    #[serde(default)]
    pub cwd: Option<String>,
    /// Nested fallback container
    #[serde(default)]
    pub workspace: Workspace,
}

/// Nested workspace block of the envelope.
#[derive(Debug, Default, Deserialize)]
pub struct Workspace {
    /// Fallback working-directory field
    #[serde(default)]
    pub current_dir: Option<String>,
}

impl StdinEnvelope {
    /// Parse the raw stdin document; `None` on malformed JSON.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Resolved working directory: `cwd` wins when present and non-empty,
    /// then `workspace.current_dir`, then nothing.
    #[must_use]
    pub fn working_dir(&self) -> Option<&str> {
        [self.cwd.as_deref(), self.workspace.current_dir.as_deref()]
            .into_iter()
            .flatten()
            .find(|dir| !dir.is_empty())
    }
}
