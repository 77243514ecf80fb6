//! Local/remote reconciliation.
//!
//! Joins the scanned local items with the snapshot by `local_file` and sorts
//! each local item into exactly one bucket:
//!
//! 1. `new_items` — no snapshot entry
//! 2. `updated_items` — snapshot entry exists, the kind allows updates, and
//!    the local timestamp is strictly newer
//! 3. `unchanged` — everything else
//!
//! Items missing locally but present in the snapshot are ignored; sync only
//! flows from local to remote.

use pressync_core::{ContentItem, UpdatePolicy};

/// Output of [`classify`]. Both item lists keep the order of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification<T> {
    pub new_items: Vec<T>,
    pub updated_items: Vec<T>,
    /// `local_file` of each skipped item.
    pub unchanged: Vec<String>,
}

impl<T> Classification<T> {
    /// `true` when nothing needs to be sent.
    pub fn is_idle(&self) -> bool {
        self.new_items.is_empty() && self.updated_items.is_empty()
    }
}

/// Classify `local` against the `remote` snapshot.
///
/// Matched items carry the snapshot's remote id and url. Equal timestamps
/// count as unchanged so that re-running without edits sends nothing.
pub fn classify<T: ContentItem>(local: Vec<T>, remote: &[T]) -> Classification<T> {
    let policy = T::KIND.update_policy();
    let mut result = Classification {
        new_items: Vec::new(),
        updated_items: Vec::new(),
        unchanged: Vec::new(),
    };

    for mut item in local {
        // Legacy snapshots may hold a key twice; the later entry is newer.
        let Some(counterpart) = remote
            .iter()
            .rev()
            .find(|r| r.local_file() == item.local_file())
        else {
            result.new_items.push(item);
            continue;
        };

        item.adopt_remote(counterpart);
        let newer = item.modified_at() > counterpart.modified_at();
        match policy {
            UpdatePolicy::WhenNewer if newer => result.updated_items.push(item),
            UpdatePolicy::WhenNewer | UpdatePolicy::PublishOnce => {
                result.unchanged.push(item.local_file().to_string());
            }
        }
    }
    result
}
