//! Reconciler for AWS MemoryDB subnet groups.
//!
//! Validates a declared subnet group, maps it onto MemoryDB control plane
//! calls and merges what the service reports (ARN, VPC, subnets, tags) back
//! into local state.
//!
//! - [`models`] - configuration, remote and local state types
//! - [`validate`] - field checks run before any API call
//! - [`naming`] - generated names and their prefixes
//! - [`tags`] - default and ignored tag policy
//! - [`client`] - the MemoryDB API seam and its implementations
//! - [`reconcile`] - plan and create/read/update/delete
//! - [`state_file`] - local state persistence
//! - [`cmd`] - command line orchestration

pub mod client;
pub mod cmd;
pub mod config;
pub mod error;
pub mod models;
pub mod naming;
pub mod output;
pub mod reconcile;
pub mod state_file;
pub mod tags;
pub mod validate;

pub use client::{AwsCliClient, InMemoryClient, SubnetGroupApi};
pub use config::ProviderConfig;
pub use error::{ApiError, ResourceError, UpdateError, ValidationError};
pub use models::{DesiredConfig, Lifecycle, SubnetGroup, SubnetGroupState, Tags};
pub use reconcile::{Plan, PlanAction, ReadMode, SubnetGroupResource};
