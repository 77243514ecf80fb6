//! `pressync sync` — publish new and edited content.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;

use pressync_core::config;
use pressync_render::CmarkRenderer;
use pressync_sync::{
    pipeline::{self, ItemOutcome, KindSyncResult},
    LogReporter, SaveOutcome, SyncContext,
};

use crate::wordpress::WordPressClient;
use crate::ScopeArgs;

/// Arguments for `pressync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Show what would be published without contacting the site or writing the snapshot.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let site = config::load_at(root).context("failed to load pressync.yaml")?;
        let ctx = SyncContext::from_config(root, &site);

        if self.dry_run {
            let results = pipeline::preview(&ctx, self.scope.into(), &LogReporter)
                .context("sync --dry-run failed")?;
            for result in &results {
                print_results(result, true);
            }
            return Ok(());
        }

        site.require_credentials()
            .context("run `pressync init` and fill in pressync.yaml")?;
        let client = WordPressClient::new(&site);
        let results = pipeline::run(
            &ctx,
            self.scope.into(),
            &client,
            &CmarkRenderer,
            &LogReporter,
        )
        .context("sync failed")?;
        for result in &results {
            print_results(result, false);
        }

        let failed: usize = results
            .iter()
            .map(|r| r.count(|i| matches!(i, ItemOutcome::Failed { .. })))
            .sum();
        let unrecorded = results.iter().filter(|r| r.save.is_failed()).count();
        if failed > 0 || unrecorded > 0 {
            bail!("{failed} item(s) failed, {unrecorded} snapshot(s) not written");
        }
        Ok(())
    }
}

fn print_results(result: &KindSyncResult, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let kind = result.kind;
    let sent = result.count(|i| {
        matches!(
            i,
            ItemOutcome::Published { .. }
                | ItemOutcome::Updated { .. }
                | ItemOutcome::WouldPublish { .. }
                | ItemOutcome::WouldUpdate { .. }
        )
    });
    let unchanged = result.count(|i| matches!(i, ItemOutcome::Unchanged { .. }));
    let failed = result.count(|i| matches!(i, ItemOutcome::Failed { .. }));

    if sent == 0 && failed == 0 {
        println!("{prefix}✓ {kind}: nothing to do ({unchanged} unchanged)");
    } else {
        println!("{prefix}✓ {kind} synced ({sent} sent, {unchanged} unchanged, {failed} failed)");
    }

    for item in &result.items {
        match item {
            ItemOutcome::Published {
                local_file,
                remote_id,
            } => println!("  +  {local_file} (#{remote_id})"),
            ItemOutcome::Updated { local_file } => println!("  ✎  {local_file}"),
            ItemOutcome::WouldPublish { local_file } => println!("  ~  {local_file} (new)"),
            ItemOutcome::WouldUpdate { local_file } => println!("  ~  {local_file} (updated)"),
            ItemOutcome::Unchanged { local_file } => println!("  ·  {local_file}"),
            ItemOutcome::Failed { local_file, reason } => {
                println!("  ✗  {local_file}: {reason}")
            }
        }
    }

    if let SaveOutcome::Failed { path, reason } = &result.save {
        println!("  !  {} not written: {reason}", path.display());
    }
}
