//! Snapshot persistence keyed by working-directory hash
//!
//! One JSON file per working directory, stored in the shared temp area and
//! addressed by the SHA-256 of the directory string. A cached snapshot is
//! trusted only while its selection fingerprint matches the freshly computed
//! one and its age is within [`TTL_SECONDS`]. Anything else, including a
//! corrupt or unreadable file, is a plain cache miss.

use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum age of a cached snapshot before it is refetched.
pub const TTL_SECONDS: i64 = 30;

/// Opaque token for "which stack is currently selected".
///
/// Wraps the workspace file's mtime in unix nanoseconds. [`Fingerprint::NEUTRAL`]
/// is the degradation value used when no fingerprint could be derived; it stays
/// distinguishable from every real mtime, and two neutral fingerprints compare
/// equal so cache validity degrades to TTL-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(Option<i64>);

impl Fingerprint {
    /// Fingerprint used when the selection state could not be observed.
    pub const NEUTRAL: Self = Self(None);

    /// Whether this is the neutral (unobserved) fingerprint.
    #[must_use]
    pub const fn is_neutral(self) -> bool {
        self.0.is_none()
    }
}

impl From<i64> for Fingerprint {
    fn from(nanos: i64) -> Self {
        Self(Some(nanos))
    }
}

/// Cached record of the selected stack's display-relevant state.
///
/// Immutable once written; a refresh always produces a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Short display name of the selected stack, never fully qualified
    pub stack_name: String,
    /// Project name from Pulumi.yaml; `None` means unknown
    #[serde(default)]
    pub project_name: Option<String>,
    /// Number of resources in the stack
    pub resource_count: u64,
    /// Result of the most recent operation, passed through verbatim;
    /// `None` means no history
    #[serde(default)]
    pub last_status: Option<String>,
    /// Timestamp of the last stack update; `None` means no recorded update
    #[serde(default)]
    pub last_update: Option<DateTime<Utc>>,
    /// When this snapshot was produced; always set at write time
    pub fetched_at: DateTime<Utc>,
    /// Selection fingerprint captured at fetch time
    pub fingerprint: Fingerprint,
}

/// Content-addressed cache file path for a working directory.
///
/// Deterministic and injective for practical purposes: distinct directory
/// strings hash to distinct file names. `root` overrides the temp directory
/// in tests.
#[must_use]
pub fn cache_file_path(cwd: &str, root: Option<&Path>) -> PathBuf {
    let digest = Sha256::digest(cwd.as_bytes());
    let base = root.map_or_else(std::env::temp_dir, Path::to_path_buf);
    base.join(format!("pulumi-ccstatusline-{}.json", hex::encode(digest)))
}

/// Load the cached snapshot for a working directory, if still valid.
///
/// Returns `None` when the file is missing, unreadable, or corrupt, when the
/// stored fingerprint differs from `current`, or when the snapshot is older
/// than [`TTL_SECONDS`]. None of these conditions is an error to the caller.
#[must_use]
pub fn read(cwd: &str, current: Fingerprint, root: Option<&Path>) -> Option<Snapshot> {
    read_at(cwd, current, Utc::now(), root)
}

/// [`read`] with an explicit clock, so tests can simulate TTL expiry.
#[must_use]
pub fn read_at(
    cwd: &str,
    current: Fingerprint,
    now: DateTime<Utc>,
    root: Option<&Path>,
) -> Option<Snapshot> {
    let path = cache_file_path(cwd, root);
    let raw = fs::read_to_string(&path).ok()?;
    let cached: Snapshot = serde_json::from_str(&raw).ok()?;

    // Stack switch or delete moves the workspace file; the stored fingerprint
    // no longer matches and the entry is dead regardless of age.
    if cached.fingerprint != current {
        debug!(path = %path.display(), "cache fingerprint mismatch");
        return None;
    }

    if now - cached.fetched_at > Duration::seconds(TTL_SECONDS) {
        debug!(path = %path.display(), "cache entry past TTL");
        return None;
    }

    Some(cached)
}

/// Persist a snapshot for a working directory, best effort.
///
/// A failed write is logged and swallowed: the next invocation simply misses
/// the cache and refetches. Last write wins between concurrent invocations.
pub fn write(cwd: &str, snapshot: &Snapshot, root: Option<&Path>) {
    if let Err(e) = try_write(cwd, snapshot, root) {
        debug!("snapshot write failed: {e}");
    }
}

fn try_write(cwd: &str, snapshot: &Snapshot, root: Option<&Path>) -> Result<()> {
    let path = cache_file_path(cwd, root);
    let json = serde_json::to_vec(snapshot)
        .map_err(|e| Error::serialization(format!("Failed to serialize snapshot: {e}")))?;
    write_owner_only(&path, &json).map_err(|e| Error::io(e, &path, "write"))?;
    debug!(path = %path.display(), "wrote snapshot");
    Ok(())
}

#[cfg(unix)]
fn write_owner_only(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_owner_only(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    fs::write(path, contents)
}
