//! Snapshot store — what has already been published, per content kind.
//!
//! Persists a JSON array of items at `<state_dir>/posts.json` and
//! `<state_dir>/media.json`. The snapshot is the only record of past
//! publishes, so:
//!
//! - a missing file is a first run, not an error;
//! - an unreadable or corrupt file is reported and treated as empty;
//! - saving always re-reads the file and merges, never replaces it with only
//!   the items of the current run.
//!
//! Writes use the `.tmp` + rename pattern.

use std::path::{Path, PathBuf};

use pressync_core::{ContentItem, ContentKind};

use crate::report::Reporter;

/// Result of [`StateStore::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing new to record; the file was not touched.
    Skipped,
    /// Snapshot written with `total` entries.
    Written { path: PathBuf, total: usize },
    /// Serialization or write failed; the previous snapshot is unchanged.
    Failed { path: PathBuf, reason: String },
}

impl SaveOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, SaveOutcome::Failed { .. })
    }
}

/// Snapshot files rooted at one state directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<state_dir>/<kind>.json` — pure, no I/O.
    pub fn path(&self, kind: ContentKind) -> PathBuf {
        self.dir.join(kind.state_file())
    }

    /// Load the snapshot for `T`. Never fails; problems are reported.
    pub fn load<T: ContentItem>(&self, reporter: &dyn Reporter) -> Vec<T> {
        let path = self.path(T::KIND);
        let name = T::KIND.state_file();
        if !path.exists() {
            reporter.info(&format!("{name} does not exist, first run?"));
            return Vec::new();
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) => {
                reporter.warn(&format!("error reading {}: {err}", path.display()));
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<T>>(&contents) {
            Ok(items) => {
                reporter.debug(&format!("loaded {} entries from {name}", items.len()));
                items
            }
            Err(err) => {
                reporter.warn(&format!("error parsing JSON from {}: {err}", path.display()));
                Vec::new()
            }
        }
    }

    /// Merge `items` into the snapshot for `T` and write it back.
    ///
    /// An entry whose `local_file` is already present replaces the stored
    /// entry in place; anything else is appended. Failures are reported and
    /// returned as [`SaveOutcome::Failed`], never escalated.
    pub fn save<T: ContentItem>(&self, items: &[T], reporter: &dyn Reporter) -> SaveOutcome {
        let name = T::KIND.state_file();
        if items.is_empty() {
            reporter.info(&format!("no new {} to write to {name}", T::KIND));
            return SaveOutcome::Skipped;
        }

        let merged = merge(self.load::<T>(reporter), items);
        let path = self.path(T::KIND);
        match write_atomic(&path, &merged) {
            Ok(()) => {
                reporter.debug(&format!("{name} written ({} entries)", merged.len()));
                SaveOutcome::Written {
                    path,
                    total: merged.len(),
                }
            }
            Err(reason) => {
                reporter.warn(&format!("error writing {}: {reason}", path.display()));
                SaveOutcome::Failed { path, reason }
            }
        }
    }
}

/// Upsert `items` into `existing` by `local_file`, collapsing any duplicate
/// entries a key may already have.
fn merge<T: ContentItem>(mut existing: Vec<T>, items: &[T]) -> Vec<T> {
    for item in items {
        let key = item.local_file();
        match existing.iter().position(|e| e.local_file() == key) {
            Some(pos) => {
                existing[pos] = item.clone();
                let mut seen = 0usize;
                existing.retain(|e| {
                    if e.local_file() != key {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => existing.push(item.clone()),
        }
    }
    existing
}

fn write_atomic<T: ContentItem>(path: &Path, items: &[T]) -> Result<(), String> {
    let json = serde_json::to_string_pretty(items).map_err(|e| format!("JSON encoding: {e}"))?;

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|e| e.to_string())?;
    if let Err(err) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(err.to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pressync_core::{Media, Post, RemoteId};
    use tempfile::TempDir;

    use crate::report::{Level, RecordingReporter};

    fn post(name: &str, id: u64) -> Post {
        let mut post = Post::from_local(
            name.to_string(),
            Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap(),
        );
        post.remote_id = Some(RemoteId(id));
        post
    }

    fn media(name: &str, id: u64) -> Media {
        let mut media = Media::from_local(name.to_string(), Utc::now());
        media.remote_id = Some(RemoteId(id));
        media
    }

    #[test]
    fn empty_snapshot_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let reporter = RecordingReporter::new();
        let loaded: Vec<Post> = StateStore::new(tmp.path()).load(&reporter);
        assert!(loaded.is_empty());
        assert!(reporter.at(Level::Warn).is_empty());
        assert_eq!(reporter.at(Level::Info).len(), 1);
    }

    #[test]
    fn corrupt_snapshot_is_empty_with_warning() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("posts.json"), "{not json").unwrap();
        let reporter = RecordingReporter::new();
        let loaded: Vec<Post> = StateStore::new(tmp.path()).load(&reporter);
        assert!(loaded.is_empty());
        let warnings = reporter.at(Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("posts.json"), "got: {warnings:?}");
    }

    #[test]
    fn save_empty_is_noop() {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::new(tmp.path());
        let reporter = RecordingReporter::new();
        let outcome = store.save::<Media>(&[], &reporter);
        assert_eq!(outcome, SaveOutcome::Skipped);
        assert!(!store.path(ContentKind::Media).exists());
    }

    #[test]
    fn save_appends_to_existing_snapshot() {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::new(tmp.path());
        let reporter = RecordingReporter::new();

        store.save(&[post("y.md", 1)], &reporter);
        let outcome = store.save(&[post("x.md", 2)], &reporter);
        assert!(matches!(outcome, SaveOutcome::Written { total: 2, .. }));

        let loaded: Vec<Post> = store.load(&reporter);
        let names: Vec<&str> = loaded.iter().map(|p| p.local_file.as_str()).collect();
        assert_eq!(names, vec!["y.md", "x.md"]);
    }

    #[test]
    fn save_replaces_entry_with_same_local_file() {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::new(tmp.path());
        let reporter = RecordingReporter::new();

        store.save(&[post("a.md", 1), post("b.md", 2)], &reporter);
        let mut updated = post("a.md", 1);
        updated.title = "Edited".to_string();
        store.save(&[updated], &reporter);

        let loaded: Vec<Post> = store.load(&reporter);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].local_file, "a.md");
        assert_eq!(loaded[0].title, "Edited");
    }

    #[test]
    fn merge_collapses_legacy_duplicates() {
        let existing = vec![post("a.md", 1), post("b.md", 2), post("a.md", 1)];
        let mut fresh = post("a.md", 1);
        fresh.title = "new".to_string();
        let merged = merge(existing, &[fresh]);
        let names: Vec<&str> = merged.iter().map(|p| p.local_file.as_str()).collect();
        assert_eq!(names, vec!["a.md", "b.md"]);
        assert_eq!(merged[0].title, "new");
    }

    #[test]
    fn tmp_file_cleaned_up_after_save() {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::new(tmp.path());
        store.save(&[media("cat.jpg", 4)], &RecordingReporter::new());
        assert!(store.path(ContentKind::Media).exists());
        assert!(!tmp.path().join("media.json.tmp").exists());
    }

    #[test]
    fn save_creates_missing_state_dir() {
        let tmp = TempDir::new().unwrap();
        let store = StateStore::new(tmp.path().join("state"));
        let outcome = store.save(&[media("cat.jpg", 4)], &RecordingReporter::new());
        assert!(matches!(outcome, SaveOutcome::Written { total: 1, .. }));
    }

    #[test]
    #[cfg(unix)]
    fn write_failure_is_reported_not_raised() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("readonly");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o555)).unwrap();

        // Root ignores directory permissions; nothing to assert there.
        let probe = dir.join("probe");
        if std::fs::write(&probe, "x").is_ok() {
            let _ = std::fs::remove_file(&probe);
            std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let reporter = RecordingReporter::new();
        let outcome = StateStore::new(&dir).save(&[post("a.md", 1)], &reporter);
        assert!(outcome.is_failed());
        assert!(!reporter.at(Level::Warn).is_empty());

        std::fs::set_permissions(&dir, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
}
