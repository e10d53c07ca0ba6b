//! MemoryDB control plane access.
//!
//! - [`SubnetGroupApi`] - the operations the reconciler needs
//! - [`AwsCliClient`] - implementation driving the `aws memorydb` command line tool
//! - [`InMemoryClient`] - in-process implementation with call recording

mod aws_cli;
mod cli;
mod memory;

use crate::error::ApiError;
use crate::models::{SubnetGroup, Tags};
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

pub use aws_cli::{parse_cli_error, AwsCliClient};
pub use cli::run;
pub use memory::{ApiCall, InMemoryClient};

#[derive(Debug, Clone, PartialEq)]
pub struct CreateSubnetGroupInput {
    pub name: String,
    pub description: String,
    pub subnet_ids: Vec<String>,
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSubnetGroupInput {
    pub name: String,
    pub description: String,
    pub subnet_ids: Vec<String>,
}

/// Control plane operations on subnet groups.
///
/// Every call takes the caller's cancellation token and must give up with
/// [`ApiError::Cancelled`] once it fires.
#[async_trait]
pub trait SubnetGroupApi: Send + Sync {
    async fn create_subnet_group(
        &self,
        ctx: &CancellationToken,
        input: CreateSubnetGroupInput,
    ) -> Result<SubnetGroup, ApiError>;

    async fn update_subnet_group(
        &self,
        ctx: &CancellationToken,
        input: UpdateSubnetGroupInput,
    ) -> Result<SubnetGroup, ApiError>;

    async fn delete_subnet_group(&self, ctx: &CancellationToken, name: &str)
        -> Result<(), ApiError>;

    /// Describe subnet groups, optionally filtered by name.
    ///
    /// A name filter that matches nothing may come back as an empty list or
    /// as a not-found fault.
    async fn describe_subnet_groups(
        &self,
        ctx: &CancellationToken,
        name_filter: Option<&str>,
    ) -> Result<Vec<SubnetGroup>, ApiError>;

    async fn list_tags(&self, ctx: &CancellationToken, arn: &str) -> Result<Tags, ApiError>;

    async fn update_tags(
        &self,
        ctx: &CancellationToken,
        arn: &str,
        removed: &[String],
        added: &Tags,
    ) -> Result<(), ApiError>;
}

/// Look up one subnet group by exact name.
///
/// An empty result and a not-found fault both come back as a not-found
/// [`ApiError`] (see [`ApiError::is_not_found`]).
pub async fn find_subnet_group_by_name<C: SubnetGroupApi + ?Sized>(
    client: &C,
    ctx: &CancellationToken,
    name: &str,
) -> Result<SubnetGroup, ApiError> {
    let groups = client.describe_subnet_groups(ctx, Some(name)).await?;

    groups
        .into_iter()
        .find(|g| g.name == name)
        .ok_or_else(|| ApiError::EmptyResult(name.to_string()))
}
