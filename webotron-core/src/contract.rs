//! # contract: storage-service interface consumed by the core
//!
//! The core never talks to a cloud SDK directly. Everything it needs from the
//! remote object store is expressed by two traits:
//!
//! - [`ObjectStore`]: a handle to one bucket that can store a local file under
//!   a key. This is the only capability [`crate::synchronise::DirectorySyncer`]
//!   requires.
//! - [`BucketAdmin`]: account-level operations used by bucket setup and the
//!   listing commands.
//!
//! Both traits are annotated for `mockall` so tests can drive the core
//! without network access. Errors are boxed trait objects; implementors
//! convert their SDK errors into them.

use async_trait::async_trait;
use std::path::Path;

use crate::setup::WebsiteConfig;

/// Boxed error returned by storage implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One object as reported by a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
}

/// Outcome of a create-bucket request.
///
/// The remote reporting that the bucket already exists *and belongs to the
/// caller* is not a failure: the bucket is adopted.
#[derive(Debug)]
pub enum BucketCreation {
    Created,
    AlreadyOwned,
    Failed(BoxError),
}

/// Write access to a single bucket.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload the file at `local_path` as `key`, tagged with `content_type`.
    async fn put_object(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<(), BoxError>;
}

/// Account-level bucket operations.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait BucketAdmin: Send + Sync {
    /// Names of all buckets visible to the caller.
    async fn list_buckets(&self) -> Result<Vec<String>, BoxError>;

    /// Every object in `bucket`.
    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectSummary>, BoxError>;

    /// Attempt to create `bucket`. Never returns an `Err`: failures are the
    /// [`BucketCreation::Failed`] variant.
    async fn create_bucket(&self, bucket: &str) -> BucketCreation;

    /// Drop the bucket's public access block so a public policy can be
    /// attached. New buckets block public policies by default.
    async fn remove_public_access_block(&self, bucket: &str) -> Result<(), BoxError>;

    /// Replace the bucket policy with the given JSON document.
    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<(), BoxError>;

    /// Enable static website hosting on `bucket`.
    async fn put_website_configuration(
        &self,
        bucket: &str,
        website: &WebsiteConfig,
    ) -> Result<(), BoxError>;

    /// Region new buckets are created in, when known.
    fn region(&self) -> Option<String>;
}
