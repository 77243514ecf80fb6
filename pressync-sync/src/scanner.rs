//! Local content discovery.

use std::path::Path;

use chrono::{DateTime, Utc};

use pressync_core::ContentItem;

use crate::error::{io_err, SyncError};
use crate::report::Reporter;

/// List the files in `dir` that belong to content kind `T`.
///
/// Only regular files whose extension matches `T::KIND` (ASCII
/// case-insensitive) are returned, sorted by file name. Each item's
/// `modified_at` is the file's mtime. An unreadable directory is fatal; an
/// entry that cannot be inspected or whose name is not UTF-8 is reported
/// and skipped.
pub fn scan<T: ContentItem>(dir: &Path, reporter: &dyn Reporter) -> Result<Vec<T>, SyncError> {
    let extension = T::KIND.extension();
    let mut items = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(|e| io_err(dir, e))? {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();

        let matches_kind = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if !matches_kind {
            continue;
        }

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                reporter.warn(&format!(
                    "skipping {}: file name is not valid UTF-8",
                    raw.to_string_lossy()
                ));
                continue;
            }
        };

        // Follows symlinks; a dangling link fails here.
        let modified = match std::fs::metadata(&path) {
            Ok(metadata) if !metadata.is_file() => continue,
            Ok(metadata) => metadata.modified(),
            Err(err) => Err(err),
        };
        let modified = match modified {
            Ok(modified) => modified,
            Err(err) => {
                reporter.warn(&format!("skipping {}: {err}", path.display()));
                continue;
            }
        };

        items.push(T::from_local(name, DateTime::<Utc>::from(modified)));
    }

    items.sort_by(|a, b| a.local_file().cmp(b.local_file()));
    Ok(items)
}
