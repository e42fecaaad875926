//! Persisted stack-status snapshots for pulumi-statusline
//!
//! This crate provides the on-disk cache between statusline invocations:
//! - One snapshot file per working directory, content-addressed by the
//!   SHA-256 of the directory string
//! - Validity checked against a selection fingerprint and a 30-second TTL
//! - Corrupt or stale entries are indistinguishable from cache misses
//!
//! Every invocation of the statusline is a fresh short-lived process, so this
//! file is the only state carried across runs. There is deliberately no
//! locking: concurrent invocations at worst duplicate one external query and
//! the last write wins.

mod error;
mod snapshot;

// Re-export error types at crate root
pub use error::{Error, Result};

// Re-export main types
pub use snapshot::{cache_file_path, read, read_at, write, Fingerprint, Snapshot, TTL_SECONDS};
