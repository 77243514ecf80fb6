//! Error types for pressync-sync.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a sync run.
///
/// Everything recoverable (snapshot problems, single failed uploads) is
/// reported through a [`crate::Reporter`] instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a single publish or update call.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The remote site answered with an error status.
    #[error("remote rejected request ({status}): {message}")]
    Remote { status: u16, message: String },

    /// The request never got an answer (DNS, TLS, connection reset, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response could not be understood.
    #[error("unexpected response: {0}")]
    Response(String),

    /// A local file needed for the upload could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An update was requested for an item that was never published.
    #[error("{local_file} has no remote id")]
    MissingRemoteId { local_file: String },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
