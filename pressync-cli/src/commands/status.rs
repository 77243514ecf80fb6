//! `pressync status` — what the next sync would do, without doing it.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use pressync_core::config;
use pressync_sync::{
    pipeline::{self, ItemOutcome, KindSyncResult},
    LogReporter, SyncContext,
};

use crate::ScopeArgs;

/// Arguments for `pressync status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, root: &Path) -> Result<()> {
        let site = config::load_at(root).context("failed to load pressync.yaml")?;
        let ctx = SyncContext::from_config(root, &site);
        let results = pipeline::preview(&ctx, self.scope.into(), &LogReporter)
            .context("failed to scan content directories")?;

        if self.json {
            return print_json(&results);
        }
        print_table(&results);
        Ok(())
    }
}

#[derive(Serialize)]
struct StatusReportJson {
    summary: StatusSummaryJson,
    items: Vec<ItemStatusJson>,
}

#[derive(Serialize)]
struct StatusSummaryJson {
    new: usize,
    updated: usize,
    unchanged: usize,
}

#[derive(Serialize)]
struct ItemStatusJson {
    kind: String,
    file: String,
    status: &'static str,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "file")]
    file: String,
    #[tabled(rename = "status")]
    status: String,
}

fn summarize(results: &[KindSyncResult]) -> StatusSummaryJson {
    let count = |pred: fn(&ItemOutcome) -> bool| -> usize {
        results.iter().map(|r| r.count(pred)).sum()
    };
    StatusSummaryJson {
        new: count(|i| matches!(i, ItemOutcome::WouldPublish { .. })),
        updated: count(|i| matches!(i, ItemOutcome::WouldUpdate { .. })),
        unchanged: count(|i| matches!(i, ItemOutcome::Unchanged { .. })),
    }
}

fn print_json(results: &[KindSyncResult]) -> Result<()> {
    let payload = StatusReportJson {
        summary: summarize(results),
        items: results
            .iter()
            .flat_map(|result| {
                result.items.iter().map(|item| ItemStatusJson {
                    kind: result.kind.to_string(),
                    file: item.local_file().to_string(),
                    status: outcome_key(item),
                })
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(results: &[KindSyncResult]) {
    let summary = summarize(results);
    println!(
        "Pressync v{} | {} new | {} updated | {} unchanged",
        env!("CARGO_PKG_VERSION"),
        summary.new,
        summary.updated,
        summary.unchanged,
    );

    let separator = "■".repeat(48).bright_black().to_string();
    println!("{separator}");
    println!(
        "Indicators: {} NEW  {} UPDATED  {} UNCHANGED",
        "■".green().bold(),
        "■".yellow().bold(),
        "■".bright_black().bold(),
    );
    println!("{separator}");
    for result in results {
        println!("{}", result.kind.to_string().to_uppercase().bold());
        if result.items.is_empty() {
            println!("No {} found.", result.kind);
            println!("{separator}");
            continue;
        }
        let rows: Vec<StatusTableRow> = result
            .items
            .iter()
            .map(|item| StatusTableRow {
                file: item.local_file().to_string(),
                status: outcome_label(item),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        println!("{separator}");
    }

    if summary.new + summary.updated > 0 {
        println!("Run 'pressync sync' to publish pending changes.");
    }
}

fn outcome_key(item: &ItemOutcome) -> &'static str {
    match item {
        ItemOutcome::WouldPublish { .. } | ItemOutcome::Published { .. } => "new",
        ItemOutcome::WouldUpdate { .. } | ItemOutcome::Updated { .. } => "updated",
        ItemOutcome::Unchanged { .. } => "unchanged",
        ItemOutcome::Failed { .. } => "failed",
    }
}

fn outcome_label(item: &ItemOutcome) -> String {
    let label = outcome_key(item).to_uppercase();
    match item {
        ItemOutcome::WouldPublish { .. } | ItemOutcome::Published { .. } => {
            label.green().to_string()
        }
        ItemOutcome::WouldUpdate { .. } | ItemOutcome::Updated { .. } => {
            label.yellow().to_string()
        }
        ItemOutcome::Unchanged { .. } => label.bright_black().to_string(),
        ItemOutcome::Failed { .. } => label.red().to_string(),
    }
}
