#![doc = "S3 integration: implements the webotron-core storage contract on top of the AWS SDK."]
//
//! # S3 Integration (CLI <-> Core)
//!
//! This module is the only place that talks to AWS. It wires the
//! [`ObjectStore`] and [`BucketAdmin`] traits from `webotron-core` to an
//! `aws_sdk_s3::Client`.
//!
//! - Construct [`S3Service`] once per invocation with [`S3Service::from_config`];
//!   credentials come from the standard AWS chain, profile and region from
//!   the CLI config.
//! - [`S3Service::bucket`] hands out an [`S3Bucket`] for uploads.
//! - SDK errors are flattened into boxed errors carrying the full error
//!   context, so the core never sees provider types.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, ErrorDocument, IndexDocument,
    WebsiteConfiguration,
};
use aws_sdk_s3::Client;
use std::path::Path;

use webotron_core::contract::{BoxError, BucketAdmin, BucketCreation, ObjectStore, ObjectSummary};
use webotron_core::setup::WebsiteConfig;

use crate::load_config::AwsSection;

// Buckets in this region must be created without a location constraint.
const DEFAULT_REGION: &str = "us-east-1";

fn sdk_error<E: std::error::Error>(err: E) -> BoxError {
    DisplayErrorContext(err).to_string().into()
}

/// Account-level S3 access.
pub struct S3Service {
    client: Client,
    region: Option<String>,
}

impl S3Service {
    pub async fn from_config(aws: &AwsSection) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(profile) = &aws.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(region) = &aws.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;
        let region = sdk_config.region().map(|r| r.to_string());

        tracing::info!(
            profile = aws.profile.as_deref().unwrap_or("<default>"),
            region = region.as_deref().unwrap_or("<unset>"),
            "Initialized S3 client"
        );
        Self {
            client: Client::new(&sdk_config),
            region,
        }
    }

    /// Wrap an already configured client, e.g. one aimed at a local endpoint.
    pub fn from_client(client: Client, region: Option<String>) -> Self {
        Self { client, region }
    }

    /// Upload handle for a single bucket, sharing this service's client.
    pub fn bucket(&self, name: &str) -> S3Bucket {
        S3Bucket {
            client: self.client.clone(),
            bucket: name.to_string(),
        }
    }
}

#[async_trait]
impl BucketAdmin for S3Service {
    async fn list_buckets(&self) -> Result<Vec<String>, BoxError> {
        tracing::info!("Listing buckets");
        let output = self.client.list_buckets().send().await.map_err(|e| {
            tracing::error!(error = %DisplayErrorContext(&e), "Failed to list buckets");
            sdk_error(e)
        })?;

        let names: Vec<String> = output
            .buckets()
            .iter()
            .filter_map(|b| b.name())
            .map(str::to_string)
            .collect();
        tracing::info!(count = names.len(), "Fetched bucket list");
        Ok(names)
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<ObjectSummary>, BoxError> {
        tracing::info!(bucket, "Listing objects in bucket");
        let mut objects = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                tracing::error!(bucket, error = %DisplayErrorContext(&e), "Failed to list objects");
                sdk_error(e)
            })?;
            for obj in page.contents() {
                if let Some(key) = obj.key() {
                    objects.push(ObjectSummary {
                        key: key.to_string(),
                        size: obj.size().unwrap_or(0).max(0) as u64,
                    });
                }
            }
        }

        tracing::info!(bucket, count = objects.len(), "Fetched object list");
        Ok(objects)
    }

    async fn create_bucket(&self, bucket: &str) -> BucketCreation {
        let mut request = self.client.create_bucket().bucket(bucket);
        if let Some(region) = self.region.as_deref().filter(|r| *r != DEFAULT_REGION) {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        tracing::info!(bucket, region = ?self.region, "Creating bucket");
        match request.send().await {
            Ok(_) => BucketCreation::Created,
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|se| se.is_bucket_already_owned_by_you()) =>
            {
                BucketCreation::AlreadyOwned
            }
            Err(e) => {
                tracing::error!(bucket, error = %DisplayErrorContext(&e), "Failed to create bucket");
                BucketCreation::Failed(sdk_error(e))
            }
        }
    }

    async fn remove_public_access_block(&self, bucket: &str) -> Result<(), BoxError> {
        tracing::debug!(bucket, "Deleting public access block");
        self.client
            .delete_public_access_block()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(bucket, error = %DisplayErrorContext(&e), "Failed to delete public access block");
                sdk_error(e)
            })?;
        Ok(())
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> Result<(), BoxError> {
        tracing::debug!(bucket, policy, "Putting bucket policy");
        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(bucket, error = %DisplayErrorContext(&e), "Failed to put bucket policy");
                sdk_error(e)
            })?;
        Ok(())
    }

    async fn put_website_configuration(
        &self,
        bucket: &str,
        website: &WebsiteConfig,
    ) -> Result<(), BoxError> {
        let configuration = WebsiteConfiguration::builder()
            .index_document(
                IndexDocument::builder()
                    .suffix(&website.index_document)
                    .build()?,
            )
            .error_document(ErrorDocument::builder().key(&website.error_document).build()?)
            .build();

        self.client
            .put_bucket_website()
            .bucket(bucket)
            .website_configuration(configuration)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(bucket, error = %DisplayErrorContext(&e), "Failed to put website configuration");
                sdk_error(e)
            })?;
        Ok(())
    }

    fn region(&self) -> Option<String> {
        self.region.clone()
    }
}

/// Upload handle for one bucket.
pub struct S3Bucket {
    client: Client,
    bucket: String,
}

impl S3Bucket {
    pub fn name(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3Bucket {
    async fn put_object(
        &self,
        local_path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<(), BoxError> {
        let body = ByteStream::from_path(local_path).await?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(bucket = %self.bucket, key, error = %DisplayErrorContext(&e), "Failed to put object");
                sdk_error(e)
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key,
            content_type,
            "Uploaded s3://{}/{}",
            self.bucket,
            key
        );
        Ok(())
    }
}
