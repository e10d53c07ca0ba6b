//! Default and ignored tag handling.
//!
//! Default tags are configured once for the whole process and merged into every
//! subnet group. They are kept in `tags_all` but hidden from the user-visible
//! `tags`. Ignored tags are never reported back at all.

use crate::models::Tags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Key prefix reserved by AWS for system tags.
pub const AWS_TAG_PREFIX: &str = "aws:";

/// Tags applied to every managed subnet group.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DefaultTagsConfig {
    #[serde(default)]
    pub tags: Tags,
}

impl DefaultTagsConfig {
    pub fn new(tags: Tags) -> Self {
        DefaultTagsConfig { tags }
    }

    /// Merge default tags under the user tags. A user value wins on key clash.
    pub fn merge(&self, user: &Tags) -> Tags {
        let mut merged = self.tags.clone();
        merged.extend(user.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// Remove every tag whose key and value both match a default tag.
    pub fn remove_defaults(&self, all: &Tags) -> Tags {
        all.iter()
            .filter(|(k, v)| self.tags.get(*k) != Some(*v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Tags the process must neither report nor manage.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IgnoreTagsConfig {
    #[serde(default)]
    pub keys: BTreeSet<String>,
    #[serde(default)]
    pub key_prefixes: Vec<String>,
}

impl IgnoreTagsConfig {
    pub fn is_ignored(&self, key: &str) -> bool {
        self.keys.contains(key) || self.key_prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }

    /// Drop ignored keys and key prefixes.
    pub fn strip(&self, tags: &Tags) -> Tags {
        tags.iter()
            .filter(|(k, _)| !self.is_ignored(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Drop AWS system tags (`aws:` prefix). These can't be set or removed.
pub fn ignore_system_tags(tags: &Tags) -> Tags {
    tags.iter()
        .filter(|(k, _)| !k.starts_with(AWS_TAG_PREFIX))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Tag difference between two full tag sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagChanges {
    /// Keys present in the old set but not in the new one.
    pub removed: Vec<String>,
    /// New keys and keys whose value changed.
    pub added: Tags,
}

impl TagChanges {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

/// Compute the removals and additions needed to go from `old` to `new`.
///
/// System tags are excluded on both sides.
pub fn diff_tags(old: &Tags, new: &Tags) -> TagChanges {
    let old = ignore_system_tags(old);
    let new = ignore_system_tags(new);

    let removed = old
        .keys()
        .filter(|k| !new.contains_key(*k))
        .cloned()
        .collect();
    let added = new
        .iter()
        .filter(|(k, v)| old.get(*k) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    TagChanges { removed, added }
}
