use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by an object store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Worth another attempt (timeouts, throttling, dropped connections).
    #[error("transient store error: {0}")]
    Transient(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("missing or invalid credentials: {0}")]
    Credentials(String),
    #[error("bucket not found: {0}")]
    BucketNotFound(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// Permission, credential and missing-bucket failures are never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transient(_) => true,
            Self::Io(err) => matches!(
                err.kind(),
                io::ErrorKind::Interrupted
                    | io::ErrorKind::TimedOut
                    | io::ErrorKind::WouldBlock
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
            ),
            Self::PermissionDenied(_) | Self::Credentials(_) | Self::BucketNotFound(_) => false,
        }
    }

    /// Map an I/O failure to the store taxonomy.
    pub fn from_io(context: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(format!("{context}: {err}")),
            _ => Self::Io(err),
        }
    }
}

/// Final outcome of an upload request.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("local file not found: {0}")]
    MissingFile(PathBuf),
    #[error("invalid folder '{0}': must be 'historical' or 'streaming'")]
    InvalidFolder(String),
    #[error("invalid local path: {0}")]
    InvalidPath(PathBuf),
    #[error("upload of '{key}' failed after {attempts} attempt(s): {source}")]
    Store {
        key: String,
        attempts: u32,
        #[source]
        source: StoreError,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
