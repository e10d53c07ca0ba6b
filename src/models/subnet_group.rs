//! MemoryDB subnet group as returned by the control plane.

use super::Tags;
use serde::{Deserialize, Serialize};

/// A subnet group. Field names follow the MemoryDB JSON wire format.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SubnetGroup {
    #[serde(rename = "ARN", default)]
    pub arn: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
}

impl SubnetGroup {
    /// Subnet identifiers in the order the API returned them.
    pub fn subnet_ids(&self) -> Vec<String> {
        self.subnets.iter().map(|s| s.identifier.clone()).collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Subnet {
    pub identifier: String,
    #[serde(default)]
    pub availability_zone: Option<AvailabilityZone>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct AvailabilityZone {
    pub name: String,
}

/// One tag in the `[{"Key": .., "Value": ..}]` wire format.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl Tag {
    pub fn from_tags(tags: &Tags) -> Vec<Tag> {
        tags.iter()
            .map(|(k, v)| Tag {
                key: k.clone(),
                value: v.clone(),
            })
            .collect()
    }

    pub fn into_tags(list: Vec<Tag>) -> Tags {
        list.into_iter().map(|t| (t.key, t.value)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_wire_format() {
        let json = r#"{
            "Name": "cache-a",
            "Description": "Managed externally",
            "VpcId": "vpc-123",
            "Subnets": [
                {"Identifier": "subnet-b", "AvailabilityZone": {"Name": "eu-west-1b"}},
                {"Identifier": "subnet-a"}
            ],
            "ARN": "arn:aws:memorydb:eu-west-1:000000000000:subnetgroup/cache-a"
        }"#;
        let group: SubnetGroup = serde_json::from_str(json).expect("Error parsing group");
        assert_eq!(group.name, "cache-a");
        assert_eq!(group.vpc_id.as_deref(), Some("vpc-123"));
        assert_eq!(group.subnet_ids(), vec!["subnet-b", "subnet-a"]);
        assert_eq!(
            group.subnets[0].availability_zone.as_ref().map(|az| az.name.as_str()),
            Some("eu-west-1b")
        );
        assert!(group.arn.ends_with("subnetgroup/cache-a"));
    }

    #[test]
    fn test_tag_list_conversion() {
        let tags: Tags = [("b".to_string(), "2".to_string()), ("a".to_string(), "1".to_string())]
            .into_iter()
            .collect();
        let list = Tag::from_tags(&tags);
        assert_eq!(list[0].key, "a");
        assert_eq!(Tag::into_tags(list), tags);
    }
}
