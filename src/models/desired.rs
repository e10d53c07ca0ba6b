//! User-declared subnet group configuration.

use super::Tags;
use crate::config::DEFAULT_DESCRIPTION;
use crate::error::ValidationError;
use crate::validate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;

/// Desired configuration for one subnet group.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DesiredConfig {
    /// Exact name. Conflicts with `name_prefix`.
    #[serde(default)]
    pub name: Option<String>,
    /// Prefix for a generated name. Conflicts with `name`.
    #[serde(default)]
    pub name_prefix: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub subnet_ids: BTreeSet<String>,
    #[serde(default)]
    pub tags: Tags,
}

impl DesiredConfig {
    /// Parse a configuration, reporting the JSON path on failure.
    pub fn from_json(json: &str) -> Result<DesiredConfig, Box<dyn Error>> {
        let mut de = serde_json::Deserializer::from_str(json);
        let config: DesiredConfig = serde_path_to_error::deserialize(&mut de).map_err(|e| {
            format!(
                "Error parsing subnet group config: path={} error={}",
                e.path(),
                e
            )
        })?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: &str) -> Result<DesiredConfig, Box<dyn Error>> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Error reading subnet group config {path}: {e}"))?;
        Self::from_json(&json)
    }

    /// Description with the default applied.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate::validate_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_defaults() {
        let config = DesiredConfig::from_json(r#"{"subnet_ids": ["subnet-b", "subnet-a", "subnet-b"]}"#)
            .expect("Error parsing config");
        assert_eq!(config.name, None);
        assert_eq!(config.description(), "Managed externally");
        assert_eq!(config.subnet_ids.len(), 2, "Duplicates should collapse");
        assert!(config.tags.is_empty());
    }

    #[test]
    fn test_from_json_unknown_field() {
        let err = DesiredConfig::from_json(r#"{"subnet_ids": ["s"], "vpc": "x"}"#)
            .expect_err("Unknown field should fail");
        assert!(err.to_string().contains("vpc"), "{err}");
    }

    #[test]
    fn test_from_json_missing_subnets() {
        assert!(DesiredConfig::from_json(r#"{"name": "a"}"#).is_err());
    }
}
