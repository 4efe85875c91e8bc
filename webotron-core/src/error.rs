//! Error types for directory sync and bucket setup

use std::path::PathBuf;
use thiserror::Error;

use crate::contract::BoxError;

/// Errors raised while syncing a local tree to a bucket.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The sync root does not exist
    #[error("Path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// The sync root exists but is not a directory
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A single file could not be read or stored; the run stops here
    #[error("Upload failed for {path}: {cause}")]
    UploadFailed {
        path: PathBuf,
        #[source]
        cause: BoxError,
    },
}

/// Errors raised while preparing a bucket for website hosting.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Could not create bucket {bucket}: {cause}")]
    Create {
        bucket: String,
        #[source]
        cause: BoxError,
    },

    #[error("Could not remove public access block from {bucket}: {cause}")]
    PublicAccessBlock {
        bucket: String,
        #[source]
        cause: BoxError,
    },

    #[error("Could not apply public-read policy to {bucket}: {cause}")]
    Policy {
        bucket: String,
        #[source]
        cause: BoxError,
    },

    #[error("Could not enable website hosting on {bucket}: {cause}")]
    Website {
        bucket: String,
        #[source]
        cause: BoxError,
    },
}
