//! Bucket setup for static website hosting.
//!
//! [`setup_bucket`] runs four steps against a [`BucketAdmin`] and stops at
//! the first failure:
//!   1. create the bucket, or adopt it when it already belongs to the caller
//!   2. remove the public access block, which rejects public policies
//!   3. attach a public-read policy covering every object in the bucket
//!   4. enable website hosting with the configured index and error documents

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::contract::{BucketAdmin, BucketCreation};
use crate::error::SetupError;

/// Index and error documents served by the website endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebsiteConfig {
    pub index_document: String,
    pub error_document: String,
}

impl Default for WebsiteConfig {
    fn default() -> Self {
        Self {
            index_document: "index.html".to_string(),
            error_document: "error.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSetupReport {
    pub bucket: String,
    /// `false` when an existing bucket owned by the caller was adopted.
    pub created: bool,
    pub website_url: Option<String>,
}

// Regions whose website endpoint is `s3-website-<region>` rather than
// `s3-website.<region>`.
const DASH_ENDPOINT_REGIONS: &[&str] = &[
    "us-east-1",
    "us-west-1",
    "us-west-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "eu-west-1",
    "sa-east-1",
    "us-gov-west-1",
];

/// Bucket policy granting anonymous read access to every object.
pub fn public_read_policy(bucket: &str) -> String {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Sid": "PublicReadGetObject",
            "Effect": "Allow",
            "Principal": "*",
            "Action": ["s3:GetObject"],
            "Resource": [format!("arn:aws:s3:::{bucket}/*")],
        }]
    })
    .to_string()
}

/// Public URL of the bucket's website endpoint.
pub fn website_endpoint(bucket: &str, region: &str) -> String {
    if DASH_ENDPOINT_REGIONS.contains(&region) {
        format!("http://{bucket}.s3-website-{region}.amazonaws.com")
    } else {
        format!("http://{bucket}.s3-website.{region}.amazonaws.com")
    }
}

pub async fn setup_bucket<A>(
    admin: &A,
    bucket: &str,
    website: &WebsiteConfig,
) -> Result<BucketSetupReport, SetupError>
where
    A: BucketAdmin + ?Sized,
{
    info!(bucket, "[SETUP] Preparing bucket for website hosting");

    let created = match admin.create_bucket(bucket).await {
        BucketCreation::Created => {
            info!(bucket, "[SETUP] Created bucket");
            true
        }
        BucketCreation::AlreadyOwned => {
            info!(bucket, "[SETUP] Bucket already exists and is owned by caller, adopting it");
            false
        }
        BucketCreation::Failed(cause) => {
            error!(bucket, error = %cause, "[SETUP][ERROR] Bucket creation failed");
            return Err(SetupError::Create {
                bucket: bucket.to_string(),
                cause,
            });
        }
    };

    admin
        .remove_public_access_block(bucket)
        .await
        .map_err(|cause| {
            error!(bucket, error = %cause, "[SETUP][ERROR] Failed to remove public access block");
            SetupError::PublicAccessBlock {
                bucket: bucket.to_string(),
                cause,
            }
        })?;
    info!(bucket, "[SETUP] Removed public access block");

    let policy = public_read_policy(bucket);
    admin
        .put_bucket_policy(bucket, &policy)
        .await
        .map_err(|cause| {
            error!(bucket, error = %cause, "[SETUP][ERROR] Failed to apply bucket policy");
            SetupError::Policy {
                bucket: bucket.to_string(),
                cause,
            }
        })?;
    info!(bucket, "[SETUP] Applied public-read policy");

    admin
        .put_website_configuration(bucket, website)
        .await
        .map_err(|cause| {
            error!(bucket, error = %cause, "[SETUP][ERROR] Failed to configure website hosting");
            SetupError::Website {
                bucket: bucket.to_string(),
                cause,
            }
        })?;
    info!(
        bucket,
        index_document = %website.index_document,
        error_document = %website.error_document,
        "[SETUP] Enabled website hosting"
    );

    let website_url = match admin.region() {
        Some(region) => Some(website_endpoint(bucket, &region)),
        None => {
            warn!(bucket, "[SETUP] No region configured, cannot derive website URL");
            None
        }
    };

    Ok(BucketSetupReport {
        bucket: bucket.to_string(),
        created,
        website_url,
    })
}
