//! Local tree discovery: which files exist under a root, and which object key
//! each one maps to.
//!
//! Walk policy:
//! - symlinks are followed; a link is keyed by its own path, not its target's
//! - directories are descended into and never produce an entry
//! - FIFOs, sockets and device files are skipped
//! - unreadable entries, link cycles, broken links and names that are not
//!   valid UTF-8 are reported as [`SyncError::UploadFailed`]
//! - entries come out depth first, sorted by file name within a directory

use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, error};
use walkdir::WalkDir;

use crate::content_type::infer_content_type;
use crate::error::SyncError;

/// A regular file under a [`LocalTree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path on the local filesystem.
    pub path: PathBuf,
    /// Root-relative path with `/` separators; doubles as the object key.
    pub key: String,
    pub content_type: &'static str,
}

/// A resolved, existing directory whose files are to be mirrored.
#[derive(Debug, Clone)]
pub struct LocalTree {
    root: PathBuf,
}

impl LocalTree {
    /// Resolve `root` (following symlinks) and check it is a directory.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, SyncError> {
        let requested = root.as_ref();
        let root = match requested.canonicalize() {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                error!(path = %requested.display(), "Sync root does not exist");
                return Err(SyncError::PathNotFound {
                    path: requested.to_path_buf(),
                });
            }
            Err(e) => {
                error!(error = ?e, path = %requested.display(), "Failed to resolve sync root");
                return Err(SyncError::UploadFailed {
                    path: requested.to_path_buf(),
                    cause: Box::new(e),
                });
            }
        };

        if !root.is_dir() {
            error!(path = %root.display(), "Sync root is not a directory");
            return Err(SyncError::NotADirectory { path: root });
        }

        debug!(root = %root.display(), "Opened local tree");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily walk the tree, yielding one item per regular file.
    pub fn entries(&self) -> impl Iterator<Item = Result<FileEntry, SyncError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .min_depth(1)
            .into_iter()
            .filter_map(move |entry| self.classify(entry))
    }

    fn classify(
        &self,
        entry: walkdir::Result<walkdir::DirEntry>,
    ) -> Option<Result<FileEntry, SyncError>> {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone());
                error!(error = %e, path = %path.display(), "Failed to read entry while walking");
                return Some(Err(SyncError::UploadFailed {
                    path,
                    cause: Box::new(e),
                }));
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            return None;
        }
        if !file_type.is_file() {
            debug!(path = %entry.path().display(), "Skipping special file");
            return None;
        }

        let path = entry.into_path();
        Some(match object_key(&self.root, &path) {
            Some(key) => Ok(FileEntry {
                content_type: infer_content_type(&key),
                key,
                path,
            }),
            None => {
                error!(path = %path.display(), "Cannot derive object key");
                Err(SyncError::UploadFailed {
                    path,
                    cause: "file name cannot be used as an object key".into(),
                })
            }
        })
    }
}

/// Object key for `path` under `root`: the relative path joined with `/`.
///
/// `None` when `path` is not strictly below `root` or a segment is not UTF-8.
pub fn object_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_str()?),
            _ => return None,
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_uses_forward_slashes() {
        let root = Path::new("/site");
        let path = Path::new("/site").join("a").join("b.html");
        assert_eq!(object_key(root, &path).as_deref(), Some("a/b.html"));
    }

    #[test]
    fn test_object_key_preserves_case() {
        let root = Path::new("/site");
        assert_eq!(
            object_key(root, Path::new("/site/Img/Logo.PNG")).as_deref(),
            Some("Img/Logo.PNG")
        );
    }

    #[test]
    fn test_object_key_rejects_root_and_outside_paths() {
        let root = Path::new("/site");
        assert_eq!(object_key(root, Path::new("/site")), None);
        assert_eq!(object_key(root, Path::new("/other/index.html")), None);
    }
}
