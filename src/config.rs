//! Provider configuration and crate-wide constants.

use crate::tags::{DefaultTagsConfig, IgnoreTagsConfig};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

/// Description sent when the user leaves `description` unset.
pub const DEFAULT_DESCRIPTION: &str = "Managed externally";

/// Maximum length of a subnet group name.
pub const NAME_MAX_LENGTH: usize = 255;

/// Length of the suffix appended by [`crate::naming::generate_name`].
pub const UNIQUE_ID_SUFFIX_LENGTH: usize = 26;

/// Largest stdout accepted from a single aws cli invocation.
pub const MAX_CLI_OUTPUT_BYTES: usize = 500_000;

/// Program invoked when no aws cli path is configured.
pub const DEFAULT_AWS_CLI: &str = "aws";

/// Settings shared by every resource the process manages.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// AWS region passed as `--region`.
    #[serde(default)]
    pub region: Option<String>,
    /// Named profile passed as `--profile`.
    #[serde(default)]
    pub profile: Option<String>,
    /// Path or name of the aws cli executable.
    #[serde(default)]
    pub aws_cli: Option<String>,
    #[serde(default)]
    pub default_tags: DefaultTagsConfig,
    #[serde(default)]
    pub ignore_tags: IgnoreTagsConfig,
}

impl ProviderConfig {
    /// Load the provider configuration.
    ///
    /// A missing `path` yields the default configuration. `AWS_REGION` and
    /// `AWS_PROFILE` from the environment (or `.env`) override file values.
    pub fn load(path: Option<&str>) -> Result<ProviderConfig, Box<dyn Error>> {
        let mut config = match path {
            Some(file) => {
                if !Path::new(file).exists() {
                    return Err(format!("Provider config file does not exist: {file}").into());
                }
                log::info!("Reading provider config: {file}");
                let json = std::fs::read_to_string(file)
                    .map_err(|e| format!("Error reading provider config {file}: {e}"))?;
                Self::from_json(&json)?
            }
            None => ProviderConfig::default(),
        };

        if let Ok(region) = std::env::var("AWS_REGION") {
            log::debug!("AWS_REGION={region} overrides provider config");
            config.region = Some(region);
        }
        if let Ok(profile) = std::env::var("AWS_PROFILE") {
            log::debug!("AWS_PROFILE={profile} overrides provider config");
            config.profile = Some(profile);
        }

        Ok(config)
    }

    /// Parse a provider configuration, reporting the JSON path on failure.
    pub fn from_json(json: &str) -> Result<ProviderConfig, Box<dyn Error>> {
        let mut de = serde_json::Deserializer::from_str(json);
        let config: ProviderConfig = serde_path_to_error::deserialize(&mut de).map_err(|e| {
            format!(
                "Error parsing provider config: path={} error={}",
                e.path(),
                e
            )
        })?;
        Ok(config)
    }

    pub fn aws_cli(&self) -> &str {
        self.aws_cli.as_deref().unwrap_or(DEFAULT_AWS_CLI)
    }
}
