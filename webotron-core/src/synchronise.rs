//! Directory sync: mirror a local tree into a bucket.
//!
//! [`DirectorySyncer`] walks a [`LocalTree`] and issues one
//! [`ObjectStore::put_object`] per regular file, keyed by the file's
//! root-relative path and tagged with its inferred content type.
//!
//! # Responsibilities
//! - Fail before any upload when the root is missing or not a directory
//! - Upload files one at a time, in the tree's deterministic walk order
//! - Fail fast: the first unreadable entry or rejected upload ends the run
//!   with [`SyncError::UploadFailed`]; nothing after it is uploaded
//! - Report every object that was stored
//!
//! The store handle is injected at construction and only borrowed; the
//! syncer keeps no state between runs.

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::contract::ObjectStore;
use crate::error::SyncError;
use crate::tree::LocalTree;

/// Result of a completed sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub root: PathBuf,
    pub uploaded: Vec<UploadedObject>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    pub key: String,
    pub content_type: String,
}

pub struct DirectorySyncer<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> DirectorySyncer<'a, S>
where
    S: ObjectStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Upload every file under `root`.
    pub async fn sync<P: AsRef<Path>>(&self, root: P) -> Result<SyncReport, SyncError> {
        let tree = LocalTree::open(root)?;
        info!(root = %tree.root().display(), "[SYNC] Starting directory sync");

        let mut uploaded = Vec::new();
        for entry in tree.entries() {
            let entry = entry?;
            debug!(
                path = %entry.path.display(),
                key = %entry.key,
                content_type = entry.content_type,
                "[SYNC] Uploading file"
            );

            if let Err(cause) = self
                .store
                .put_object(&entry.path, &entry.key, entry.content_type)
                .await
            {
                error!(
                    error = %cause,
                    path = %entry.path.display(),
                    key = %entry.key,
                    "[SYNC][ERROR] Upload failed, aborting"
                );
                return Err(SyncError::UploadFailed {
                    path: entry.path,
                    cause,
                });
            }

            uploaded.push(UploadedObject {
                key: entry.key,
                content_type: entry.content_type.to_string(),
            });
        }

        info!(
            root = %tree.root().display(),
            uploaded = uploaded.len(),
            "[SYNC] Directory sync complete"
        );
        Ok(SyncReport {
            root: tree.root().to_path_buf(),
            uploaded,
        })
    }
}
