//! Pulumi stack status line for Claude Code prompts
//!
//! Invoked by the host UI on every prompt render with a JSON envelope on
//! stdin. Prints at most one line and always exits 0: a broken prompt
//! adornment must never break the prompt. All the caching that makes this
//! cheap to call lives in `statusline-pulumi` / `statusline-cache`.

// The rendered line is this binary's entire purpose - stdout output is intentional
#![allow(clippy::print_stdout)]

mod envelope;
mod format;

use clap::Parser;
use envelope::StdinEnvelope;
use statusline_pulumi::{project_file, StatusFetcher};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Command-line arguments.
///
/// Normal operation takes the working directory from the stdin envelope;
/// `--cwd` exists for invoking the tool by hand.
#[derive(Debug, Parser)]
#[command(name = "pulumi-statusline", version, about)]
struct Cli {
    /// Working directory override (skips reading the stdin envelope)
    #[arg(long)]
    cwd: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the rendered line.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    // Single-threaded runtime: two bounded subprocess calls at most, and
    // prompt rendering is latency-sensitive.
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            debug!("failed to create runtime: {e}");
            return;
        }
    };

    if let Some(line) = rt.block_on(run(cli)) {
        println!("{line}");
    }
}

async fn run(cli: Cli) -> Option<String> {
    let cwd = match cli.cwd {
        Some(cwd) => cwd,
        None => PathBuf::from(working_dir_from_stdin()?),
    };

    // Not a Pulumi project: stay silent rather than render a misleading line.
    if !project_file(&cwd).exists() {
        return None;
    }

    render_status(&cwd).await
}

fn working_dir_from_stdin() -> Option<String> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw).ok()?;
    StdinEnvelope::parse(&raw)?
        .working_dir()
        .map(String::from)
}

async fn render_status(cwd: &Path) -> Option<String> {
    let fetcher = StatusFetcher::new();
    match fetcher.get_snapshot(cwd).await {
        Some(snapshot) => Some(format::render(&snapshot)),
        None => Some(format::render_no_stack()),
    }
}
