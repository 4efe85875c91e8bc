//! CLI interface for webotron: command parsing and the async entrypoint.
//!
//! All sync and setup logic lives in `webotron-core`; this module only
//! loads configuration, builds the S3 client for the invocation, and prints
//! results.
//!
//! For programmatic or integration-test use, call [`run`] with a constructed
//! [`Cli`].

use crate::load_config::{load_config, CliConfig};
use crate::s3::S3Service;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use webotron_core::contract::{BoxError, BucketAdmin};
use webotron_core::setup::setup_bucket;
use webotron_core::synchronise::DirectorySyncer;

/// Webotron deploys websites to AWS.
#[derive(Parser)]
#[clap(name = "webotron", version, about = "Webotron deploys websites to AWS")]
pub struct Cli {
    /// Path to an optional YAML config file
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// AWS profile to use, overrides the config file
    #[clap(long, global = true)]
    pub profile: Option<String>,

    /// AWS region to use, overrides the config file
    #[clap(long, global = true)]
    pub region: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all S3 buckets
    ListBuckets,
    /// List objects in an S3 bucket
    ListBucketObjects {
        /// Name of the bucket
        bucket: String,
    },
    /// Create and configure an S3 bucket for static website hosting
    SetupBucket {
        /// Name of the bucket
        bucket: String,
    },
    /// Sync the contents of PATHNAME to BUCKET
    Sync {
        /// Local directory holding the site
        pathname: PathBuf,
        /// Name of the bucket
        bucket: String,
    },
}

// Keep the boxed error as the source so `{:#}` and `chain()` still reach
// whatever caused it.
fn storage_error(cause: BoxError) -> anyhow::Error {
    anyhow::Error::from_boxed(cause)
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => CliConfig::default(),
    }
    .with_overrides(cli.profile, cli.region);

    match cli.command {
        Commands::ListBuckets => {
            let s3 = S3Service::from_config(&config.aws).await;
            let buckets = s3
                .list_buckets()
                .await
                .map_err(storage_error)
                .context("Failed to list buckets")?;
            for bucket in buckets {
                println!("{bucket}");
            }
        }
        Commands::ListBucketObjects { bucket } => {
            let s3 = S3Service::from_config(&config.aws).await;
            let objects = s3
                .list_objects(&bucket)
                .await
                .map_err(storage_error)
                .with_context(|| format!("Failed to list objects in {bucket}"))?;
            for object in objects {
                println!("{}\t{}", object.key, object.size);
            }
        }
        Commands::SetupBucket { bucket } => {
            tracing::info!(command = "setup-bucket", bucket = %bucket, "Starting bucket setup");
            let s3 = S3Service::from_config(&config.aws).await;
            let report = setup_bucket(&s3, &bucket, &config.website).await?;
            let verb = if report.created { "Created" } else { "Adopted existing" };
            println!("{verb} bucket {}", report.bucket);
            if let Some(url) = report.website_url {
                println!("Website URL: {url}");
            }
        }
        Commands::Sync { pathname, bucket } => {
            if !pathname.exists() {
                tracing::error!(command = "sync", path = %pathname.display(), "Sync path does not exist");
                anyhow::bail!("Path does not exist: {}", pathname.display());
            }
            tracing::info!(command = "sync", path = %pathname.display(), bucket = %bucket, "Starting synchronisation");
            let s3 = S3Service::from_config(&config.aws).await;
            let store = s3.bucket(&bucket);
            match DirectorySyncer::new(&store).sync(&pathname).await {
                Ok(report) => {
                    tracing::info!(command = "sync", uploaded = report.uploaded.len(), "Synchronisation complete");
                    println!(
                        "Uploaded {} files from {} to s3://{}",
                        report.uploaded.len(),
                        report.root.display(),
                        store.name()
                    );
                }
                Err(e) => {
                    tracing::error!(command = "sync", error = %e, "Synchronisation failed");
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Throttled;

    impl fmt::Display for Throttled {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("slow down")
        }
    }

    impl std::error::Error for Throttled {}

    #[derive(Debug)]
    struct ListFailed(Throttled);

    impl fmt::Display for ListFailed {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("ListBuckets request failed")
        }
    }

    impl std::error::Error for ListFailed {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn storage_error_keeps_the_cause_chain() {
        let err = Err::<(), BoxError>(Box::new(ListFailed(Throttled)))
            .map_err(storage_error)
            .context("Failed to list buckets")
            .unwrap_err();

        let chain: Vec<String> = err.chain().map(|e| e.to_string()).collect();
        assert_eq!(
            chain,
            ["Failed to list buckets", "ListBuckets request failed", "slow down"]
        );
        assert_eq!(
            format!("{err:#}"),
            "Failed to list buckets: ListBuckets request failed: slow down"
        );
    }
}
