//! Desired configuration to API request mapping.

use crate::client::{CreateSubnetGroupInput, UpdateSubnetGroupInput};
use crate::models::{DesiredConfig, Tags};
use crate::tags::{ignore_system_tags, DefaultTagsConfig, IgnoreTagsConfig};

/// Tags sent on create: default tags under user tags, system tags removed.
fn create_tags(config: &DesiredConfig, defaults: &DefaultTagsConfig) -> Tags {
    ignore_system_tags(&defaults.merge(&config.tags))
}

/// Tag set the group is expected to show on read. Ignored keys are left out,
/// as a read never reports them.
pub fn planned_tags_all(
    config: &DesiredConfig,
    defaults: &DefaultTagsConfig,
    ignore: &IgnoreTagsConfig,
) -> Tags {
    ignore.strip(&create_tags(config, defaults))
}

pub fn expand_create_input(
    name: &str,
    config: &DesiredConfig,
    defaults: &DefaultTagsConfig,
) -> CreateSubnetGroupInput {
    CreateSubnetGroupInput {
        name: name.to_string(),
        description: config.description().to_string(),
        subnet_ids: config.subnet_ids.iter().cloned().collect(),
        tags: create_tags(config, defaults),
    }
}

/// Update request carrying the full subnet list, not a delta.
pub fn expand_update_input(id: &str, config: &DesiredConfig) -> UpdateSubnetGroupInput {
    UpdateSubnetGroupInput {
        name: id.to_string(),
        description: config.description().to_string(),
        subnet_ids: config.subnet_ids.iter().cloned().collect(),
    }
}
