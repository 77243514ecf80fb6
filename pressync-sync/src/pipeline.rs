//! Shared sync pipeline entrypoint used by the `status` and `sync` commands.
//!
//! Per content kind: scan → load snapshot → classify → publish → save.
//! Posts run before media.

use std::path::{Path, PathBuf};

use pressync_core::{ContentItem, ContentKind, Media, Post, RemoteId, SiteConfig};
use pressync_render::MarkdownRenderer;

use crate::publish::{PublishBatch, PublishDriver, Publisher};
use crate::reconcile::{classify, Classification};
use crate::report::Reporter;
use crate::scanner::scan;
use crate::state_store::{SaveOutcome, StateStore};
use crate::SyncError;

/// Scope for a sync pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncScope {
    /// Posts, then media.
    All,
    Posts,
    Media,
}

impl SyncScope {
    pub fn kinds(self) -> &'static [ContentKind] {
        match self {
            SyncScope::All => ContentKind::all(),
            SyncScope::Posts => &[ContentKind::Post],
            SyncScope::Media => &[ContentKind::Media],
        }
    }
}

/// Where content and snapshots live for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncContext {
    pub posts_dir: PathBuf,
    pub media_dir: PathBuf,
    pub state: StateStore,
}

impl SyncContext {
    /// Resolve every configured directory against `root`.
    pub fn from_config(root: &Path, config: &SiteConfig) -> Self {
        Self {
            posts_dir: config.content_dir(root, ContentKind::Post),
            media_dir: config.content_dir(root, ContentKind::Media),
            state: StateStore::new(config.state_dir(root)),
        }
    }

    pub fn content_dir(&self, kind: ContentKind) -> &Path {
        match kind {
            ContentKind::Post => &self.posts_dir,
            ContentKind::Media => &self.media_dir,
        }
    }
}

/// What happened (or would happen) to one local item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Published { local_file: String, remote_id: RemoteId },
    Updated { local_file: String },
    Unchanged { local_file: String },
    /// Preview only: the item has no snapshot entry.
    WouldPublish { local_file: String },
    /// Preview only: the item is newer than its snapshot entry.
    WouldUpdate { local_file: String },
    Failed { local_file: String, reason: String },
}

impl ItemOutcome {
    pub fn local_file(&self) -> &str {
        match self {
            ItemOutcome::Published { local_file, .. }
            | ItemOutcome::Updated { local_file }
            | ItemOutcome::Unchanged { local_file }
            | ItemOutcome::WouldPublish { local_file }
            | ItemOutcome::WouldUpdate { local_file }
            | ItemOutcome::Failed { local_file, .. } => local_file,
        }
    }
}

/// Outcome of syncing one content kind.
#[derive(Debug)]
pub struct KindSyncResult {
    pub kind: ContentKind,
    /// Sorted by `local_file`.
    pub items: Vec<ItemOutcome>,
    pub save: SaveOutcome,
}

impl KindSyncResult {
    fn new(kind: ContentKind, mut items: Vec<ItemOutcome>, save: SaveOutcome) -> Self {
        items.sort_by(|a, b| a.local_file().cmp(b.local_file()));
        Self { kind, items, save }
    }

    pub fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| pred(item)).count()
    }
}

/// Classify every kind in `scope` without publishing or writing anything.
pub fn preview(
    ctx: &SyncContext,
    scope: SyncScope,
    reporter: &dyn Reporter,
) -> Result<Vec<KindSyncResult>, SyncError> {
    let mut results = Vec::new();
    for kind in scope.kinds() {
        let result = match kind {
            ContentKind::Post => preview_kind(plan::<Post>(ctx, reporter)?),
            ContentKind::Media => preview_kind(plan::<Media>(ctx, reporter)?),
        };
        results.push(result);
    }
    Ok(results)
}

/// Publish everything in `scope` that is new or updated and record it.
///
/// Only an unreadable content directory aborts the run; snapshot problems
/// and rejected items are reported and reflected in the result.
pub fn run(
    ctx: &SyncContext,
    scope: SyncScope,
    publisher: &dyn Publisher,
    renderer: &dyn MarkdownRenderer,
    reporter: &dyn Reporter,
) -> Result<Vec<KindSyncResult>, SyncError> {
    let driver = PublishDriver::new(
        publisher,
        renderer,
        reporter,
        &ctx.posts_dir,
        &ctx.media_dir,
    );
    let mut results = Vec::new();
    for kind in scope.kinds() {
        let result = match kind {
            ContentKind::Post => sync_posts(ctx, &driver, reporter)?,
            ContentKind::Media => sync_media(ctx, &driver, reporter)?,
        };
        results.push(result);
    }
    Ok(results)
}

fn plan<T: ContentItem>(
    ctx: &SyncContext,
    reporter: &dyn Reporter,
) -> Result<Classification<T>, SyncError> {
    let local = scan::<T>(ctx.content_dir(T::KIND), reporter)?;
    let remote = ctx.state.load::<T>(reporter);
    let plan = classify(local, &remote);
    reporter.debug(&format!(
        "{}: {} new, {} updated, {} unchanged",
        T::KIND,
        plan.new_items.len(),
        plan.updated_items.len(),
        plan.unchanged.len()
    ));
    for name in &plan.unchanged {
        reporter.debug(&format!("skipping {name}"));
    }
    Ok(plan)
}

fn preview_kind<T: ContentItem>(plan: Classification<T>) -> KindSyncResult {
    let mut items = unchanged_outcomes(&plan);
    items.extend(plan.new_items.iter().map(|item| ItemOutcome::WouldPublish {
        local_file: item.local_file().to_string(),
    }));
    items.extend(plan.updated_items.iter().map(|item| ItemOutcome::WouldUpdate {
        local_file: item.local_file().to_string(),
    }));
    KindSyncResult::new(T::KIND, items, SaveOutcome::Skipped)
}

fn sync_posts(
    ctx: &SyncContext,
    driver: &PublishDriver<'_>,
    reporter: &dyn Reporter,
) -> Result<KindSyncResult, SyncError> {
    let plan = plan::<Post>(ctx, reporter)?;
    let mut items = unchanged_outcomes(&plan);

    let created = driver.publish_new_posts(plan.new_items);
    let updated = driver.publish_post_updates(plan.updated_items);
    items.extend(created.done.iter().map(published_outcome));
    items.extend(updated.done.iter().map(|post| ItemOutcome::Updated {
        local_file: post.local_file.clone(),
    }));
    items.extend(failed_outcomes(&created));
    items.extend(failed_outcomes(&updated));

    let mut accepted = created.done;
    accepted.extend(updated.done);
    let save = record(ctx, &accepted, reporter);
    Ok(KindSyncResult::new(ContentKind::Post, items, save))
}

fn sync_media(
    ctx: &SyncContext,
    driver: &PublishDriver<'_>,
    reporter: &dyn Reporter,
) -> Result<KindSyncResult, SyncError> {
    let plan = plan::<Media>(ctx, reporter)?;
    let mut items = unchanged_outcomes(&plan);

    let uploaded = driver.publish_new_media(plan.new_items);
    items.extend(uploaded.done.iter().map(published_outcome));
    items.extend(failed_outcomes(&uploaded));

    let save = record(ctx, &uploaded.done, reporter);
    Ok(KindSyncResult::new(ContentKind::Media, items, save))
}

/// Save accepted items; a failed write leaves them unrecorded.
fn record<T: ContentItem>(
    ctx: &SyncContext,
    accepted: &[T],
    reporter: &dyn Reporter,
) -> SaveOutcome {
    let save = ctx.state.save(accepted, reporter);
    if save.is_failed() {
        reporter.warn(&format!(
            "{} published {} item(s) could not be recorded; the next run will publish them again",
            T::KIND,
            accepted.len()
        ));
    }
    save
}

fn unchanged_outcomes<T>(plan: &Classification<T>) -> Vec<ItemOutcome> {
    plan.unchanged
        .iter()
        .map(|name| ItemOutcome::Unchanged {
            local_file: name.clone(),
        })
        .collect()
}

fn published_outcome<T: ContentItem>(item: &T) -> ItemOutcome {
    match item.remote_id() {
        Some(remote_id) => ItemOutcome::Published {
            local_file: item.local_file().to_string(),
            remote_id,
        },
        None => ItemOutcome::Failed {
            local_file: item.local_file().to_string(),
            reason: "remote site returned no id".to_string(),
        },
    }
}

fn failed_outcomes<T>(batch: &PublishBatch<T>) -> impl Iterator<Item = ItemOutcome> + '_ {
    batch.failed.iter().map(|failed| ItemOutcome::Failed {
        local_file: failed.local_file.clone(),
        reason: failed.error.to_string(),
    })
}
