//! Field validation run before any API call.

use crate::config::{NAME_MAX_LENGTH, UNIQUE_ID_SUFFIX_LENGTH};
use crate::error::ValidationError;
use crate::models::DesiredConfig;
use lazy_static::lazy_static;
use regex::Regex;

const DOUBLE_HYPHEN_MSG: &str = "The name may not contain two consecutive hyphens.";
const NAME_PATTERN_MSG: &str =
    "Only lowercase alphanumeric characters and hyphens allowed. The name may not end with a hyphen.";
const PREFIX_PATTERN_MSG: &str = "Only lowercase alphanumeric characters and hyphens allowed.";

lazy_static! {
    // MemoryDB normalises names to lowercase.
    static ref NAME_RE: Regex = Regex::new(r"^[a-z0-9-]*[a-z0-9]$").expect("Invalid Regex?");
    static ref PREFIX_RE: Regex = Regex::new(r"^[a-z0-9-]+$").expect("Invalid Regex?");
}

/// Longest prefix that still leaves room for the generated suffix.
pub const NAME_PREFIX_MAX_LENGTH: usize = NAME_MAX_LENGTH - UNIQUE_ID_SUFFIX_LENGTH;

fn check_length(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    if value.is_empty() || value.len() > max {
        return Err(ValidationError::new(
            field,
            format!(
                "expected length to be in the range (1 - {max}), got {}",
                value.len()
            ),
        ));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    check_length("name", name, NAME_MAX_LENGTH)?;
    if name.contains("--") {
        return Err(ValidationError::new("name", DOUBLE_HYPHEN_MSG));
    }
    if !NAME_RE.is_match(name) {
        return Err(ValidationError::new("name", NAME_PATTERN_MSG));
    }
    Ok(())
}

pub fn validate_name_prefix(prefix: &str) -> Result<(), ValidationError> {
    check_length("name_prefix", prefix, NAME_PREFIX_MAX_LENGTH)?;
    if prefix.contains("--") {
        return Err(ValidationError::new("name_prefix", DOUBLE_HYPHEN_MSG));
    }
    if !PREFIX_RE.is_match(prefix) {
        return Err(ValidationError::new("name_prefix", PREFIX_PATTERN_MSG));
    }
    Ok(())
}

/// Check every field of a desired configuration.
pub fn validate_config(config: &DesiredConfig) -> Result<(), ValidationError> {
    if config.name.is_some() && config.name_prefix.is_some() {
        return Err(ValidationError::new(
            "name",
            "conflicts with name_prefix",
        ));
    }
    if let Some(name) = &config.name {
        validate_name(name)?;
    }
    if let Some(prefix) = &config.name_prefix {
        validate_name_prefix(prefix)?;
    }
    if config.subnet_ids.is_empty() {
        return Err(ValidationError::new(
            "subnet_ids",
            "attribute requires 1 item minimum, but config has only 0 declared",
        ));
    }
    Ok(())
}
