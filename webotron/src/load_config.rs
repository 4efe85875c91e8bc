//! `load_config` module: loads the optional YAML config file into a [`CliConfig`].
//!
//! The file carries no secrets. Credentials come from the standard AWS
//! credential chain (environment, `.env`, shared profiles).
//!
//! # Accepted schema
//! Every key is optional; missing sections take their defaults.
//!
//! ```yaml
//! aws:
//!   profile: default
//!   region: eu-west-1
//! website:
//!   index_document: index.html
//!   error_document: error.html
//! ```
//!
//! # Errors
//! Unreadable files and invalid YAML are reported as `anyhow::Error` and
//! surfaced at the CLI boundary.

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};
use webotron_core::setup::WebsiteConfig;

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub aws: AwsSection,
    pub website: WebsiteConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AwsSection {
    /// Named profile from the shared AWS config files.
    pub profile: Option<String>,
    pub region: Option<String>,
}

impl CliConfig {
    /// Command-line flags win over file values.
    pub fn with_overrides(mut self, profile: Option<String>, region: Option<String>) -> Self {
        if profile.is_some() {
            self.aws.profile = profile;
        }
        if region.is_some() {
            self.aws.region = region;
        }
        self
    }
}

/// Loads a static YAML config file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    if config_content.trim().is_empty() {
        info!(config_path = ?path_ref, "Config file is empty, using defaults");
        return Ok(CliConfig::default());
    }

    match serde_yaml::from_str::<CliConfig>(&config_content) {
        Ok(conf) => {
            info!(
                config_path = ?path_ref,
                profile = conf.aws.profile.as_deref().unwrap_or("<default>"),
                region = conf.aws.region.as_deref().unwrap_or("<default>"),
                "Parsed config YAML successfully"
            );
            Ok(conf)
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            Err(anyhow::anyhow!("Failed to parse config YAML: {e}"))
        }
    }
}
