//! Reconciliation of a subnet group's desired configuration with MemoryDB.
//!
//! - [`mapper`] - configuration to API requests
//! - [`plan`] - what has to change
//! - [`resource`] - the create/read/update/delete state machine

mod mapper;
mod plan;
mod resource;

pub use mapper::{expand_create_input, expand_update_input, planned_tags_all};
pub use plan::{plan, plan_destroy, replacement_reason, subnet_group_changed, Plan, PlanAction};
pub use resource::{ReadMode, SubnetGroupResource};
