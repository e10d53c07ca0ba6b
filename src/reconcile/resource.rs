//! Create/read/update/delete for one MemoryDB subnet group.

use super::mapper::{expand_create_input, expand_update_input, planned_tags_all};
use super::plan::{plan, plan_destroy, replacement_reason, subnet_group_changed, Plan, PlanAction};
use crate::client::{find_subnet_group_by_name, SubnetGroupApi};
use crate::config::ProviderConfig;
use crate::error::{ApiError, ResourceError, UpdateError, UpdateFailure, UpdateOp};
use crate::models::{DesiredConfig, Lifecycle, SubnetGroupState};
use crate::naming;
use crate::tags::{diff_tags, ignore_system_tags, DefaultTagsConfig, IgnoreTagsConfig};
use crate::validate::validate_name;
use colored::Colorize;
use itertools::Itertools;
use tokio_util::sync::CancellationToken;

/// How a missing remote group is treated by [`SubnetGroupResource::read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// The group was just created; it must exist.
    NewResource,
    /// A known group; if it is gone the state is dropped.
    Refresh,
}

fn require_id(state: &SubnetGroupState) -> Result<String, ResourceError> {
    state
        .id
        .clone()
        .ok_or_else(|| ResourceError::InvalidState("subnet group has no id".to_string()))
}

fn transition(id: &str, from: Lifecycle, to: Lifecycle) {
    log::info!(
        "MemoryDB Subnet Group ({id}): {from} -> {to}",
        id = id.bold(),
        to = to.to_string().green()
    );
}

/// Reconciler for the MemoryDB subnet group resource.
///
/// The API client and the process-wide tag policy are injected; nothing is
/// read from global state.
pub struct SubnetGroupResource<C> {
    client: C,
    default_tags: DefaultTagsConfig,
    ignore_tags: IgnoreTagsConfig,
}

impl<C: SubnetGroupApi> SubnetGroupResource<C> {
    pub fn new(client: C, config: &ProviderConfig) -> Self {
        SubnetGroupResource {
            client,
            default_tags: config.default_tags.clone(),
            ignore_tags: config.ignore_tags.clone(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn default_tags(&self) -> &DefaultTagsConfig {
        &self.default_tags
    }

    pub fn ignore_tags(&self) -> &IgnoreTagsConfig {
        &self.ignore_tags
    }

    /// Create the group and fill `state` from a fresh read.
    ///
    /// `state.id` is only set once the create call succeeded, so a failed
    /// create leaves nothing for the orchestrator to track.
    pub async fn create(
        &self,
        ctx: &CancellationToken,
        config: &DesiredConfig,
        state: &mut SubnetGroupState,
    ) -> Result<(), ResourceError> {
        config.validate()?;
        let name = naming::resolve_name(config.name.as_deref(), config.name_prefix.as_deref());
        validate_name(&name)?;

        let input = expand_create_input(&name, config, &self.default_tags);
        transition(&name, Lifecycle::Absent, Lifecycle::Creating);
        log::debug!("Creating MemoryDB Subnet Group: {:?}", input);

        self.client
            .create_subnet_group(ctx, input)
            .await
            .map_err(|source| ResourceError::Create {
                name: name.clone(),
                source,
            })?;

        *state = SubnetGroupState::with_id(&name);
        self.read(ctx, state, ReadMode::NewResource).await?;
        transition(&name, Lifecycle::Creating, Lifecycle::Present);
        Ok(())
    }

    /// Refresh `state` from the remote group.
    ///
    /// A missing group clears `state.id` in [`ReadMode::Refresh`] and is an
    /// error in [`ReadMode::NewResource`].
    pub async fn read(
        &self,
        ctx: &CancellationToken,
        state: &mut SubnetGroupState,
        mode: ReadMode,
    ) -> Result<(), ResourceError> {
        let id = require_id(state)?;

        let found = find_subnet_group_by_name(&self.client, ctx, &id).await;
        let group = match found {
            Ok(group) => group,
            Err(e) if e.is_not_found() && mode == ReadMode::Refresh => {
                log::warn!(
                    "MemoryDB Subnet Group ({id}) not found, removing from state",
                    id = id.yellow()
                );
                state.id = None;
                return Ok(());
            }
            Err(e) if e.is_not_found() => return Err(ResourceError::NotFoundAfterCreate { id }),
            Err(source) => return Err(ResourceError::Read { id, source }),
        };

        state.apply_remote(&group, naming::prefix_from_name(&group.name));
        log::debug!(
            "read {id}: vpc={vpc:?} subnets=[{subnets}]",
            vpc = state.vpc_id,
            subnets = state.subnet_ids.iter().join(", ")
        );

        let remote_tags = self
            .client
            .list_tags(ctx, &state.arn)
            .await
            .map_err(|source| {
                log::warn!("listing tags for {id} failed: {source}");
                ResourceError::Read {
                    id: id.clone(),
                    source,
                }
            })?;

        let tags = self.ignore_tags.strip(&ignore_system_tags(&remote_tags));
        state.tags = self.default_tags.remove_defaults(&tags);
        state.tags_all = tags;

        Ok(())
    }

    /// Bring the group in line with `config`.
    ///
    /// The subnet group update and the tag update run independently; every
    /// failure is collected into one [`UpdateError`]. `state` is only
    /// refreshed when both succeeded.
    pub async fn update(
        &self,
        ctx: &CancellationToken,
        state: &mut SubnetGroupState,
        config: &DesiredConfig,
    ) -> Result<(), ResourceError> {
        config.validate()?;
        let id = require_id(state)?;
        if let Some(field) = replacement_reason(state, config) {
            return Err(ResourceError::RequiresReplacement { id, field });
        }

        transition(&id, Lifecycle::Present, Lifecycle::Updating);
        let mut failures: Vec<UpdateFailure> = Vec::new();

        if subnet_group_changed(state, config) {
            let input = expand_update_input(&id, config);
            log::debug!("Updating MemoryDB Subnet Group: {:?}", input);
            if let Err(source) = self.client.update_subnet_group(ctx, input).await {
                log::warn!("subnet group update of {id} failed: {source}");
                failures.push(UpdateFailure {
                    op: UpdateOp::SubnetGroup,
                    source,
                });
            }
        }

        let tags_all = planned_tags_all(config, &self.default_tags, &self.ignore_tags);
        let changes = diff_tags(&state.tags_all, &tags_all);
        if !changes.is_empty() {
            log::debug!(
                "Updating MemoryDB Subnet Group ({id}) tags: removed=[{}] added=[{}]",
                changes.removed.iter().join(", "),
                changes.added.keys().join(", ")
            );
            let result = if state.arn.is_empty() {
                Err(ApiError::Command(format!("no ARN known for {id}")))
            } else {
                self.client
                    .update_tags(ctx, &state.arn, &changes.removed, &changes.added)
                    .await
            };
            if let Err(source) = result {
                log::warn!("tag update of {id} failed: {source}");
                failures.push(UpdateFailure {
                    op: UpdateOp::Tags,
                    source,
                });
            }
        }

        if !failures.is_empty() {
            return Err(UpdateError { id, failures }.into());
        }

        self.read(ctx, state, ReadMode::Refresh).await?;
        transition(&id, Lifecycle::Updating, state.lifecycle());
        Ok(())
    }

    /// Delete the group. A group that is already gone counts as deleted.
    pub async fn delete(
        &self,
        ctx: &CancellationToken,
        state: &mut SubnetGroupState,
    ) -> Result<(), ResourceError> {
        let id = require_id(state)?;
        transition(&id, Lifecycle::Present, Lifecycle::Deleting);
        log::debug!("Deleting MemoryDB Subnet Group: ({id})");

        let deleted = self.client.delete_subnet_group(ctx, &id).await;
        match deleted {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                log::debug!("MemoryDB Subnet Group ({id}) already gone: {e}");
            }
            Err(source) => return Err(ResourceError::Delete { id, source }),
        }

        state.id = None;
        transition(&id, Lifecycle::Deleting, Lifecycle::Absent);
        Ok(())
    }

    /// Adopt an existing group by name.
    pub async fn import(
        &self,
        ctx: &CancellationToken,
        name: &str,
    ) -> Result<SubnetGroupState, ResourceError> {
        let mut state = SubnetGroupState::with_id(name);
        self.read(ctx, &mut state, ReadMode::Refresh).await?;
        if state.id.is_none() {
            return Err(ResourceError::Read {
                id: name.to_string(),
                source: ApiError::EmptyResult(name.to_string()),
            });
        }
        Ok(state)
    }

    /// Refresh `state`, plan against `config` and carry the plan out.
    ///
    /// Returns the plan that was applied.
    pub async fn apply(
        &self,
        ctx: &CancellationToken,
        state: &mut SubnetGroupState,
        config: &DesiredConfig,
    ) -> Result<Plan, ResourceError> {
        config.validate()?;
        if state.id.is_some() {
            self.read(ctx, state, ReadMode::Refresh).await?;
        }

        let plan = plan(Some(&*state), config, &self.default_tags, &self.ignore_tags);
        log::info!("plan: {}", plan.action.to_string().cyan());

        match &plan.action {
            PlanAction::NoOp | PlanAction::Delete => {}
            PlanAction::Create => self.create(ctx, config, state).await?,
            PlanAction::Update { .. } => self.update(ctx, state, config).await?,
            PlanAction::Replace { .. } => {
                self.delete(ctx, state).await?;
                *state = SubnetGroupState::default();
                self.create(ctx, config, state).await?;
            }
        }
        Ok(plan)
    }

    /// Refresh `state` and delete the group if it still exists.
    pub async fn destroy(
        &self,
        ctx: &CancellationToken,
        state: &mut SubnetGroupState,
    ) -> Result<Plan, ResourceError> {
        if state.id.is_some() {
            self.read(ctx, state, ReadMode::Refresh).await?;
        }
        let plan = plan_destroy(Some(&*state));
        log::info!("plan: {}", plan.action.to_string().cyan());
        if plan.action == PlanAction::Delete {
            self.delete(ctx, state).await?;
        }
        Ok(plan)
    }
}
