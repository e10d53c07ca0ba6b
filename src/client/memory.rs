//! In-process [`SubnetGroupApi`] that records every call.
//!
//! Behaves like the MemoryDB control plane for the calls the reconciler makes,
//! and can be told to fail a call, return subnets in a different order, or
//! lose a freshly created group.

use super::{CreateSubnetGroupInput, SubnetGroupApi, UpdateSubnetGroupInput};
use crate::error::{ApiError, SUBNET_GROUP_NOT_FOUND_FAULT};
use crate::models::{Subnet, SubnetGroup, Tags};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

const ALREADY_EXISTS_FAULT: &str = "SubnetGroupAlreadyExistsFault";
const ARN_PREFIX: &str = "arn:aws:memorydb:us-east-1:000000000000:subnetgroup/";
const DEFAULT_VPC: &str = "vpc-0a1b2c3d";

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    CreateSubnetGroup(CreateSubnetGroupInput),
    UpdateSubnetGroup(UpdateSubnetGroupInput),
    DeleteSubnetGroup(String),
    DescribeSubnetGroups(Option<String>),
    ListTags(String),
    UpdateTags {
        arn: String,
        removed: Vec<String>,
        added: Tags,
    },
}

impl ApiCall {
    pub fn op(&self) -> &'static str {
        match self {
            ApiCall::CreateSubnetGroup(_) => "CreateSubnetGroup",
            ApiCall::UpdateSubnetGroup(_) => "UpdateSubnetGroup",
            ApiCall::DeleteSubnetGroup(_) => "DeleteSubnetGroup",
            ApiCall::DescribeSubnetGroups(_) => "DescribeSubnetGroups",
            ApiCall::ListTags(_) => "ListTags",
            ApiCall::UpdateTags { .. } => "UpdateTags",
        }
    }
}

#[derive(Default)]
struct Inner {
    groups: BTreeMap<String, SubnetGroup>,
    tags: HashMap<String, Tags>,
    calls: Vec<ApiCall>,
    failures: HashMap<&'static str, ApiError>,
    reverse_subnet_order: bool,
    describe_returns_empty: bool,
    lose_next_create: bool,
}

/// In-memory MemoryDB control plane.
#[derive(Default)]
pub struct InMemoryClient {
    inner: Mutex<Inner>,
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record `call` and return the injected failure for its operation, if any.
    fn begin(&self, ctx: &CancellationToken, call: ApiCall) -> Result<MutexGuard<'_, Inner>, ApiError> {
        if ctx.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        let mut inner = self.lock();
        let op = call.op();
        inner.calls.push(call);
        let failure = inner.failures.remove(op);
        match failure {
            Some(err) => Err(err),
            None => Ok(inner),
        }
    }

    /// Fail the next call of `op` (for example `"UpdateTags"`) with `err`.
    pub fn fail_next(&self, op: &'static str, err: ApiError) {
        self.lock().failures.insert(op, err);
    }

    /// Store subnets in reverse input order, as the real API may reorder them.
    pub fn set_reverse_subnet_order(&self, reverse: bool) {
        self.lock().reverse_subnet_order = reverse;
    }

    /// Answer a name-filtered describe of a missing group with an empty list
    /// instead of a not-found fault.
    pub fn set_describe_returns_empty(&self, empty: bool) {
        self.lock().describe_returns_empty = empty;
    }

    /// Accept the next create but never store the group.
    pub fn lose_next_create(&self) {
        self.lock().lose_next_create = true;
    }

    /// Delete a group behind the reconciler's back.
    pub fn remove_group(&self, name: &str) -> Option<SubnetGroup> {
        let mut inner = self.lock();
        let group = inner.groups.remove(name)?;
        inner.tags.remove(&group.arn);
        Some(group)
    }

    pub fn group(&self, name: &str) -> Option<SubnetGroup> {
        self.lock().groups.get(name).cloned()
    }

    pub fn tags_for(&self, arn: &str) -> Tags {
        self.lock().tags.get(arn).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Number of recorded calls of `op`.
    pub fn count(&self, op: &str) -> usize {
        self.lock().calls.iter().filter(|c| c.op() == op).count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

fn not_found(name: &str) -> ApiError {
    ApiError::service(
        SUBNET_GROUP_NOT_FOUND_FAULT,
        format!("Subnet group {name} not found."),
    )
}

fn subnets(ids: &[String], reverse: bool) -> Vec<Subnet> {
    let mut subnets: Vec<Subnet> = ids
        .iter()
        .map(|id| Subnet {
            identifier: id.clone(),
            availability_zone: None,
        })
        .collect();
    if reverse {
        subnets.reverse();
    }
    subnets
}

#[async_trait]
impl SubnetGroupApi for InMemoryClient {
    async fn create_subnet_group(
        &self,
        ctx: &CancellationToken,
        input: CreateSubnetGroupInput,
    ) -> Result<SubnetGroup, ApiError> {
        let mut inner = self.begin(ctx, ApiCall::CreateSubnetGroup(input.clone()))?;
        if inner.groups.contains_key(&input.name) {
            return Err(ApiError::service(
                ALREADY_EXISTS_FAULT,
                format!("Subnet group {} already exists.", input.name),
            ));
        }

        let group = SubnetGroup {
            arn: format!("{ARN_PREFIX}{}", input.name),
            name: input.name.clone(),
            description: Some(input.description),
            vpc_id: Some(DEFAULT_VPC.to_string()),
            subnets: subnets(&input.subnet_ids, inner.reverse_subnet_order),
        };

        if inner.lose_next_create {
            inner.lose_next_create = false;
            return Ok(group);
        }
        inner.tags.insert(group.arn.clone(), input.tags);
        inner.groups.insert(input.name, group.clone());
        Ok(group)
    }

    async fn update_subnet_group(
        &self,
        ctx: &CancellationToken,
        input: UpdateSubnetGroupInput,
    ) -> Result<SubnetGroup, ApiError> {
        let mut inner = self.begin(ctx, ApiCall::UpdateSubnetGroup(input.clone()))?;
        let reverse = inner.reverse_subnet_order;
        let group = inner
            .groups
            .get_mut(&input.name)
            .ok_or_else(|| not_found(&input.name))?;
        group.description = Some(input.description);
        group.subnets = subnets(&input.subnet_ids, reverse);
        Ok(group.clone())
    }

    async fn delete_subnet_group(
        &self,
        ctx: &CancellationToken,
        name: &str,
    ) -> Result<(), ApiError> {
        let mut inner = self.begin(ctx, ApiCall::DeleteSubnetGroup(name.to_string()))?;
        let group = inner.groups.remove(name).ok_or_else(|| not_found(name))?;
        inner.tags.remove(&group.arn);
        Ok(())
    }

    async fn describe_subnet_groups(
        &self,
        ctx: &CancellationToken,
        name_filter: Option<&str>,
    ) -> Result<Vec<SubnetGroup>, ApiError> {
        let inner = self.begin(
            ctx,
            ApiCall::DescribeSubnetGroups(name_filter.map(str::to_string)),
        )?;
        match name_filter {
            Some(name) => match inner.groups.get(name) {
                Some(group) => Ok(vec![group.clone()]),
                None if inner.describe_returns_empty => Ok(vec![]),
                None => Err(not_found(name)),
            },
            None => Ok(inner.groups.values().cloned().collect()),
        }
    }

    async fn list_tags(&self, ctx: &CancellationToken, arn: &str) -> Result<Tags, ApiError> {
        let inner = self.begin(ctx, ApiCall::ListTags(arn.to_string()))?;
        inner
            .tags
            .get(arn)
            .cloned()
            .ok_or_else(|| ApiError::service("InvalidARNFault", format!("{arn} not found")))
    }

    async fn update_tags(
        &self,
        ctx: &CancellationToken,
        arn: &str,
        removed: &[String],
        added: &Tags,
    ) -> Result<(), ApiError> {
        let mut inner = self.begin(
            ctx,
            ApiCall::UpdateTags {
                arn: arn.to_string(),
                removed: removed.to_vec(),
                added: added.clone(),
            },
        )?;
        let tags = inner
            .tags
            .get_mut(arn)
            .ok_or_else(|| ApiError::service("InvalidARNFault", format!("{arn} not found")))?;
        for key in removed {
            tags.remove(key);
        }
        tags.extend(added.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str) -> CreateSubnetGroupInput {
        CreateSubnetGroupInput {
            name: name.to_string(),
            description: "d".to_string(),
            subnet_ids: vec!["subnet-a".to_string(), "subnet-b".to_string()],
            tags: Tags::new(),
        }
    }

    #[tokio::test]
    async fn test_create_twice_fails() {
        let ctx = CancellationToken::new();
        let client = InMemoryClient::new();
        client.create_subnet_group(&ctx, input("g")).await.expect("first create");
        let err = client
            .create_subnet_group(&ctx, input("g"))
            .await
            .expect_err("second create");
        assert_eq!(err.code(), Some(ALREADY_EXISTS_FAULT));
        assert_eq!(client.count("CreateSubnetGroup"), 2);
    }

    #[tokio::test]
    async fn test_reverse_subnet_order() {
        let ctx = CancellationToken::new();
        let client = InMemoryClient::new();
        client.set_reverse_subnet_order(true);
        let group = client.create_subnet_group(&ctx, input("g")).await.expect("create");
        assert_eq!(group.subnet_ids(), vec!["subnet-b", "subnet-a"]);
    }

    #[tokio::test]
    async fn test_fail_next_is_consumed() {
        let ctx = CancellationToken::new();
        let client = InMemoryClient::new();
        client.fail_next("DescribeSubnetGroups", ApiError::Command("boom".to_string()));
        assert!(client.describe_subnet_groups(&ctx, None).await.is_err());
        assert!(client.describe_subnet_groups(&ctx, None).await.is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_token() {
        let ctx = CancellationToken::new();
        ctx.cancel();
        let client = InMemoryClient::new();
        let err = client.delete_subnet_group(&ctx, "g").await.expect_err("cancelled");
        assert_eq!(err, ApiError::Cancelled);
        assert!(client.calls().is_empty());
    }
}
