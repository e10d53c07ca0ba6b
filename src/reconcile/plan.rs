//! Change planning between local state and desired configuration.

use super::mapper::planned_tags_all;
use crate::models::{DesiredConfig, SubnetGroupState, Tags};
use crate::tags::{diff_tags, DefaultTagsConfig, IgnoreTagsConfig, TagChanges};
use itertools::Itertools;
use std::fmt;

/// What a reconciliation cycle has to do.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    NoOp,
    Create,
    Update {
        subnet_group: bool,
        tags: TagChanges,
    },
    /// `field` cannot change in place; destroy and create again.
    Replace { field: &'static str },
    Delete,
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanAction::NoOp => write!(f, "no changes"),
            PlanAction::Create => write!(f, "create"),
            PlanAction::Update { subnet_group, tags } => {
                let mut parts = Vec::new();
                if *subnet_group {
                    parts.push("subnet group".to_string());
                }
                if !tags.is_empty() {
                    parts.push(format!(
                        "tags (-[{}] +[{}])",
                        tags.removed.iter().join(", "),
                        tags.added.keys().join(", ")
                    ));
                }
                write!(f, "update {}", parts.join(" and "))
            }
            PlanAction::Replace { field } => write!(f, "replace ({field} changed)"),
            PlanAction::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub action: PlanAction,
    /// Tag set the group will carry after the plan is applied.
    pub tags_all: Tags,
}

/// Field forcing a replacement, if any.
///
/// An unset `name` and `name_prefix` keep whatever name the group already has.
pub fn replacement_reason(state: &SubnetGroupState, desired: &DesiredConfig) -> Option<&'static str> {
    if let Some(name) = &desired.name {
        if *name != state.name {
            return Some("name");
        }
    } else if let Some(prefix) = &desired.name_prefix {
        if Some(prefix) != state.name_prefix.as_ref() {
            return Some("name_prefix");
        }
    }
    None
}

/// Whether anything other than tags differs.
pub fn subnet_group_changed(state: &SubnetGroupState, desired: &DesiredConfig) -> bool {
    desired.description() != state.description || desired.subnet_ids != state.subnet_id_set()
}

pub fn plan(
    prior: Option<&SubnetGroupState>,
    desired: &DesiredConfig,
    defaults: &DefaultTagsConfig,
    ignore: &IgnoreTagsConfig,
) -> Plan {
    let tags_all = planned_tags_all(desired, defaults, ignore);

    let action = match prior.filter(|s| s.id.is_some()) {
        None => PlanAction::Create,
        Some(state) => match replacement_reason(state, desired) {
            Some(field) => PlanAction::Replace { field },
            None => {
                let subnet_group = subnet_group_changed(state, desired);
                let tags = diff_tags(&state.tags_all, &tags_all);
                if subnet_group || !tags.is_empty() {
                    PlanAction::Update { subnet_group, tags }
                } else {
                    PlanAction::NoOp
                }
            }
        },
    };

    Plan { action, tags_all }
}

pub fn plan_destroy(prior: Option<&SubnetGroupState>) -> Plan {
    let action = match prior {
        Some(state) if state.id.is_some() => PlanAction::Delete,
        _ => PlanAction::NoOp,
    };
    Plan {
        action,
        tags_all: Tags::new(),
    }
}
