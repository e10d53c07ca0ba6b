//! Command line orchestration of a single subnet group.

use crate::client::AwsCliClient;
use crate::config::ProviderConfig;
use crate::models::{DesiredConfig, SubnetGroupState};
use crate::output::print_state;
use crate::reconcile::{plan, plan_destroy, ReadMode, SubnetGroupResource};
use crate::state_file::{read_state, write_state};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::error::Error;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "subnet-group", about = "Reconcile a MemoryDB subnet group")]
pub struct Cli {
    /// Provider configuration (region, profile, default and ignored tags).
    #[arg(long, env = "SUBNET_GROUP_PROVIDER_CONFIG")]
    pub provider: Option<String>,

    /// State file for the managed subnet group.
    #[arg(long, default_value = "subnet-group.state.json")]
    pub state: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a configuration file without calling AWS.
    Validate { config: String },
    /// Show what `apply` would do.
    Plan { config: String },
    /// Create, update or replace the subnet group to match the configuration.
    Apply { config: String },
    /// Re-read the subnet group into the state file.
    Refresh,
    /// Adopt an existing subnet group by name.
    Import { name: String },
    /// Delete the subnet group.
    Destroy,
    /// Print the state file.
    Show,
}

/// Run one CLI command to completion.
pub async fn run(cli: Cli, ctx: CancellationToken) -> Result<(), Box<dyn Error>> {
    if let Command::Validate { config } = &cli.command {
        let desired = DesiredConfig::from_file(config)?;
        desired.validate()?;
        println!("{} {config}", "valid".green());
        return Ok(());
    }

    let provider = ProviderConfig::load(cli.provider.as_deref())?;
    let resource = SubnetGroupResource::new(AwsCliClient::new(&provider), &provider);
    let prior = read_state(&cli.state)?;

    match cli.command {
        Command::Validate { .. } => {}
        Command::Plan { config } => {
            let desired = DesiredConfig::from_file(&config)?;
            desired.validate()?;
            let mut state = prior.unwrap_or_default();
            if state.id.is_some() {
                resource.read(&ctx, &mut state, ReadMode::Refresh).await?;
            }
            let plan = plan(
                Some(&state),
                &desired,
                resource.default_tags(),
                resource.ignore_tags(),
            );
            println!("{} {}", "plan:".bold(), plan.action.to_string().cyan());
        }
        Command::Apply { config } => {
            let desired = DesiredConfig::from_file(&config)?;
            let mut state = prior.unwrap_or_default();
            let result = resource.apply(&ctx, &mut state, &desired).await;
            // Keep whatever was created even if a later step failed.
            write_state(&cli.state, &state)?;
            let plan = result?;
            println!("{} {}", "applied:".bold(), plan.action.to_string().cyan());
            print_state(&state);
        }
        Command::Refresh => {
            let mut state = prior.ok_or("Nothing to refresh: no state file")?;
            if state.id.is_some() {
                resource.read(&ctx, &mut state, ReadMode::Refresh).await?;
            }
            write_state(&cli.state, &state)?;
            print_state(&state);
        }
        Command::Import { name } => {
            if prior.as_ref().is_some_and(|s| s.id.is_some()) {
                return Err(format!("State file {} already tracks a subnet group", cli.state).into());
            }
            let state = resource.import(&ctx, &name).await?;
            write_state(&cli.state, &state)?;
            print_state(&state);
        }
        Command::Destroy => {
            let mut state: SubnetGroupState = prior.unwrap_or_default();
            if plan_destroy(Some(&state)).action == crate::reconcile::PlanAction::NoOp {
                println!("{}", "nothing to destroy".yellow());
                return Ok(());
            }
            let result = resource.destroy(&ctx, &mut state).await;
            write_state(&cli.state, &state)?;
            let plan = result?;
            println!("{} {}", "destroyed:".bold(), plan.action.to_string().cyan());
        }
        Command::Show => match prior {
            Some(state) => print_state(&state),
            None => println!("{}", "no state".yellow()),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply() {
        let cli = Cli::parse_from(["subnet-group", "--state", "s.json", "apply", "group.json"]);
        assert_eq!(cli.state, "s.json");
        match cli.command {
            Command::Apply { config } => assert_eq!(config, "group.json"),
            other => panic!("Unexpected command {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_validate_command_rejects_bad_name() {
        let path = std::env::temp_dir()
            .join(format!("subnet_group_cmd_{}.json", std::process::id()))
            .to_string_lossy()
            .to_string();
        std::fs::write(&path, r#"{"name": "Bad--Name", "subnet_ids": ["subnet-a"]}"#)
            .expect("Error writing config");
        let cli = Cli::parse_from(["subnet-group", "validate", path.as_str()]);
        let err = run(cli, CancellationToken::new())
            .await
            .expect_err("Invalid name");
        assert!(err.to_string().starts_with("invalid name"), "{err}");
        std::fs::remove_file(&path).ok();
    }
}
