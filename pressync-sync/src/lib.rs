//! # pressync-sync
//!
//! Reconciliation engine: decides which local posts and media still need to
//! be published and keeps the snapshot of published items current.
//!
//! Call [`pipeline::preview`] to classify without side effects, or
//! [`pipeline::run`] to publish through a [`Publisher`] and record the result.

pub mod error;
pub mod pipeline;
pub mod publish;
pub mod reconcile;
pub mod report;
pub mod scanner;
pub mod state_store;

pub use error::{PublishError, SyncError};
pub use pipeline::{ItemOutcome, KindSyncResult, SyncContext, SyncScope};
pub use publish::{Publisher, RemoteMedia, RemotePost};
pub use reconcile::{classify, Classification};
pub use report::{Level, LogReporter, RecordingReporter, Reporter};
pub use state_store::{SaveOutcome, StateStore};
