//! Domain models for the MemoryDB subnet group resource.
//!
//! - [`DesiredConfig`] - what the user declared
//! - [`SubnetGroup`] - the group as the MemoryDB API reports it
//! - [`SubnetGroupState`] - what the orchestrator keeps between runs

mod desired;
mod state;
mod subnet_group;

use std::collections::BTreeMap;

/// Tag key to tag value.
pub type Tags = BTreeMap<String, String>;

pub use desired::DesiredConfig;
pub use state::{Lifecycle, SubnetGroupState};
pub use subnet_group::{AvailabilityZone, Subnet, SubnetGroup, Tag};
