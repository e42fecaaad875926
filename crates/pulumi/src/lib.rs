//! Pulumi stack-status acquisition for pulumi-statusline
//!
//! This crate answers "what is the current stack status" for a working
//! directory:
//! - Selection fingerprinting from Pulumi's own workspace-state files
//!   (no subprocess on the hot path)
//! - Two bounded CLI queries (`stack ls`, `stack history`) behind the
//!   [`CommandRunner`] capability trait
//! - Orchestration that prefers the persisted snapshot and refreshes only
//!   on fingerprint or TTL invalidation
//!
//! All failure modes degrade: a failed primary query means "no stack
//! selected", a failed secondary query drops only the status field, and a
//! failed fingerprint probe falls back to TTL-only caching.

mod error;
mod project;
mod runner;
mod stack;
mod status;
mod workspace;

// Re-export error types at crate root
pub use error::{Error, Result};

// Re-export main types
pub use project::{project_file, read_project_name};
pub use runner::{CommandRunner, PulumiCli, COMMAND_TIMEOUT_SECONDS};
pub use stack::{
    extract_stack_name, fetch_last_status, fetch_stack_info, HistoryEntry, StackInfo,
    StackListEntry,
};
pub use status::StatusFetcher;
pub use workspace::{default_workspaces_dir, selection_fingerprint};
