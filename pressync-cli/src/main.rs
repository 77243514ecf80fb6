//! Pressync — publish a local folder of markdown posts and images to a site.
//!
//! # Usage
//!
//! ```text
//! pressync init [--site-url <url>] [--username <name>]
//! pressync status [--posts | --media] [--json]
//! pressync sync [--posts | --media] [--dry-run]
//! ```
//!
//! Every command works on the current directory unless `--root` is given.

mod commands;
mod wordpress;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use commands::{init::InitArgs, status::StatusArgs, sync::SyncArgs};
use pressync_sync::SyncScope;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "pressync",
    version,
    about = "Publish local markdown posts and images to a WordPress site",
    long_about = None,
)]
struct Cli {
    /// Site directory holding pressync.yaml, posts/ and media/.
    #[arg(long, short = 'C', global = true, default_value = ".")]
    root: PathBuf,

    /// Log every skipped item and snapshot detail.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a pressync.yaml template and create the content directories.
    Init(InitArgs),

    /// Show what the next sync would publish, update or skip.
    Status(StatusArgs),

    /// Publish new and edited content, then record it in the snapshot.
    Sync(SyncArgs),
}

// ---------------------------------------------------------------------------
// Shared scope flags
// ---------------------------------------------------------------------------

/// `--posts` / `--media`; neither means both kinds.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct ScopeArgs {
    /// Only posts.
    #[arg(long, conflicts_with = "media")]
    pub posts: bool,

    /// Only media.
    #[arg(long)]
    pub media: bool,
}

impl From<ScopeArgs> for SyncScope {
    fn from(args: ScopeArgs) -> Self {
        match (args.posts, args.media) {
            (true, _) => SyncScope::Posts,
            (false, true) => SyncScope::Media,
            (false, false) => SyncScope::All,
        }
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Init(args) => args.run(&cli.root),
        Commands::Status(args) => args.run(&cli.root),
        Commands::Sync(args) => args.run(&cli.root),
    }
}

/// Logs go to stderr so `status --json` output stays parseable.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
