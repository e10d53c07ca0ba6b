//! Local state kept by the orchestrator between reconciliation cycles.

use super::{SubnetGroup, Tags};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Where a subnet group is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Absent,
    Creating,
    Present,
    Updating,
    Deleting,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Lifecycle::Absent => "absent",
            Lifecycle::Creating => "creating",
            Lifecycle::Present => "present",
            Lifecycle::Updating => "updating",
            Lifecycle::Deleting => "deleting",
        };
        f.write_str(s)
    }
}

/// Mirror of the remote subnet group plus both tag views.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SubnetGroupState {
    /// Durable id (the resolved name). `None` once the group is gone.
    pub id: Option<String>,
    pub arn: String,
    pub name: String,
    pub name_prefix: Option<String>,
    pub description: String,
    /// Subnet identifiers in API order.
    pub subnet_ids: Vec<String>,
    pub vpc_id: Option<String>,
    /// User-visible tags, default tags removed.
    pub tags: Tags,
    /// Every tag on the group, default tags included.
    pub tags_all: Tags,
}

impl SubnetGroupState {
    /// Fresh state for a group known only by its id.
    pub fn with_id(id: &str) -> Self {
        SubnetGroupState {
            id: Some(id.to_string()),
            name: id.to_string(),
            ..Default::default()
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        if self.id.is_some() {
            Lifecycle::Present
        } else {
            Lifecycle::Absent
        }
    }

    pub fn subnet_id_set(&self) -> BTreeSet<String> {
        self.subnet_ids.iter().cloned().collect()
    }

    /// Copy the remote attributes of `group` into this state.
    pub fn apply_remote(&mut self, group: &SubnetGroup, name_prefix: Option<String>) {
        self.arn = group.arn.clone();
        self.name = group.name.clone();
        self.name_prefix = name_prefix;
        self.description = group.description.clone().unwrap_or_default();
        self.subnet_ids = group.subnet_ids();
        self.vpc_id = group.vpc_id.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subnet;

    #[test]
    fn test_apply_remote_keeps_api_order() {
        let group = SubnetGroup {
            arn: "arn:x".to_string(),
            name: "g".to_string(),
            description: Some("d".to_string()),
            vpc_id: Some("vpc-1".to_string()),
            subnets: vec![
                Subnet {
                    identifier: "subnet-b".to_string(),
                    availability_zone: None,
                },
                Subnet {
                    identifier: "subnet-a".to_string(),
                    availability_zone: None,
                },
            ],
        };
        let mut state = SubnetGroupState::with_id("g");
        state.apply_remote(&group, None);
        assert_eq!(state.subnet_ids, vec!["subnet-b", "subnet-a"]);
        assert_eq!(state.subnet_id_set().len(), 2);
        assert_eq!(state.lifecycle(), Lifecycle::Present);
        assert_eq!(state.vpc_id.as_deref(), Some("vpc-1"));
    }

    #[test]
    fn test_default_is_absent() {
        assert_eq!(SubnetGroupState::default().lifecycle(), Lifecycle::Absent);
    }
}
