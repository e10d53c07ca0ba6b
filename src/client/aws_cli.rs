//! [`SubnetGroupApi`] backed by the `aws memorydb` command line tool.

use super::cli;
use super::{CreateSubnetGroupInput, SubnetGroupApi, UpdateSubnetGroupInput};
use crate::config::ProviderConfig;
use crate::error::ApiError;
use crate::models::{SubnetGroup, Tag, Tags};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

lazy_static! {
    static ref CLI_ERROR_RE: Regex =
        Regex::new(r"An error occurred \(([A-Za-z0-9]+)\) when calling the \w+ operation: (.*)")
            .expect("Invalid Regex?");
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct SubnetGroupOutput {
    subnet_group: SubnetGroup,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct DescribeSubnetGroupsOutput {
    #[serde(default)]
    next_token: Option<String>,
    #[serde(default)]
    subnet_groups: Vec<SubnetGroup>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct TagListOutput {
    #[serde(default)]
    tag_list: Vec<Tag>,
}

/// Turn aws cli stderr into an [`ApiError`].
///
/// `An error occurred (Code) when calling the Op operation: message` becomes
/// [`ApiError::Service`]; anything else stays a [`ApiError::Command`].
pub fn parse_cli_error(stderr: &str) -> ApiError {
    match CLI_ERROR_RE.captures(stderr) {
        Some(caps) => ApiError::Service {
            code: caps[1].to_string(),
            message: caps[2].trim().to_string(),
        },
        None => ApiError::Command(stderr.to_string()),
    }
}

fn parse_output<T: DeserializeOwned>(op: &str, output: &str) -> Result<T, ApiError> {
    let mut de = serde_json::Deserializer::from_str(output);
    serde_path_to_error::deserialize(&mut de).map_err(|e| {
        log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
        ApiError::Parse(format!("{op}: path={} error={}", e.path(), e))
    })
}

fn tags_json(tags: &Tags) -> Result<String, ApiError> {
    serde_json::to_string(&Tag::from_tags(tags))
        .map_err(|e| ApiError::Parse(format!("Error serializing tags: {e}")))
}

/// MemoryDB client that shells out to the aws cli.
#[derive(Debug, Clone)]
pub struct AwsCliClient {
    program: String,
    region: Option<String>,
    profile: Option<String>,
}

impl AwsCliClient {
    pub fn new(config: &ProviderConfig) -> Self {
        AwsCliClient {
            program: config.aws_cli().to_string(),
            region: config.region.clone(),
            profile: config.profile.clone(),
        }
    }

    /// Full argument list for `aws memorydb <op> <params>`.
    fn args(&self, op: &str, params: Vec<String>) -> Vec<String> {
        let mut args = vec!["memorydb".to_string(), op.to_string()];
        args.extend(params);
        args.extend(["--output".to_string(), "json".to_string()]);
        if let Some(region) = &self.region {
            args.extend(["--region".to_string(), region.clone()]);
        }
        if let Some(profile) = &self.profile {
            args.extend(["--profile".to_string(), profile.clone()]);
        }
        args
    }

    async fn call(
        &self,
        ctx: &CancellationToken,
        op: &str,
        params: Vec<String>,
    ) -> Result<String, ApiError> {
        let args = self.args(op, params);
        cli::run(ctx, &self.program, &args)
            .await
            .map_err(|e| match e {
                ApiError::Command(stderr) => parse_cli_error(&stderr),
                other => other,
            })
    }
}

fn flag(name: &str, value: &str) -> [String; 2] {
    [name.to_string(), value.to_string()]
}

#[async_trait]
impl SubnetGroupApi for AwsCliClient {
    async fn create_subnet_group(
        &self,
        ctx: &CancellationToken,
        input: CreateSubnetGroupInput,
    ) -> Result<SubnetGroup, ApiError> {
        let mut params: Vec<String> = Vec::new();
        params.extend(flag("--subnet-group-name", &input.name));
        params.extend(flag("--description", &input.description));
        params.push("--subnet-ids".to_string());
        params.extend(input.subnet_ids);
        if !input.tags.is_empty() {
            params.extend(flag("--tags", &tags_json(&input.tags)?));
        }

        let output = self.call(ctx, "create-subnet-group", params).await?;
        let parsed: SubnetGroupOutput = parse_output("create-subnet-group", &output)?;
        Ok(parsed.subnet_group)
    }

    async fn update_subnet_group(
        &self,
        ctx: &CancellationToken,
        input: UpdateSubnetGroupInput,
    ) -> Result<SubnetGroup, ApiError> {
        let mut params: Vec<String> = Vec::new();
        params.extend(flag("--subnet-group-name", &input.name));
        params.extend(flag("--description", &input.description));
        params.push("--subnet-ids".to_string());
        params.extend(input.subnet_ids);

        let output = self.call(ctx, "update-subnet-group", params).await?;
        let parsed: SubnetGroupOutput = parse_output("update-subnet-group", &output)?;
        Ok(parsed.subnet_group)
    }

    async fn delete_subnet_group(
        &self,
        ctx: &CancellationToken,
        name: &str,
    ) -> Result<(), ApiError> {
        let params = flag("--subnet-group-name", name).to_vec();
        self.call(ctx, "delete-subnet-group", params).await?;
        Ok(())
    }

    async fn describe_subnet_groups(
        &self,
        ctx: &CancellationToken,
        name_filter: Option<&str>,
    ) -> Result<Vec<SubnetGroup>, ApiError> {
        let mut groups: Vec<SubnetGroup> = Vec::new();
        let mut next_token: Option<String> = None;
        let mut count_pages = 0;

        loop {
            let mut params: Vec<String> = Vec::new();
            if let Some(name) = name_filter {
                params.extend(flag("--subnet-group-name", name));
            }
            if let Some(token) = &next_token {
                params.extend(flag("--next-token", token));
            }

            let output = self.call(ctx, "describe-subnet-groups", params).await?;
            let page: DescribeSubnetGroupsOutput = parse_output("describe-subnet-groups", &output)?;
            log::debug!(
                "got page#{count_pages:2} groups=+{count:3} => {total:3}",
                count = page.subnet_groups.len(),
                total = groups.len() + page.subnet_groups.len(),
            );
            groups.extend(page.subnet_groups);
            count_pages += 1;

            match page.next_token {
                Some(token) if next_token.as_deref() == Some(token.as_str()) => {
                    return Err(ApiError::Parse(
                        "NextToken not unique - possible infinite loop".to_string(),
                    ));
                }
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        Ok(groups)
    }

    async fn list_tags(&self, ctx: &CancellationToken, arn: &str) -> Result<Tags, ApiError> {
        let params = flag("--resource-arn", arn).to_vec();
        let output = self.call(ctx, "list-tags", params).await?;
        let parsed: TagListOutput = parse_output("list-tags", &output)?;
        Ok(Tag::into_tags(parsed.tag_list))
    }

    async fn update_tags(
        &self,
        ctx: &CancellationToken,
        arn: &str,
        removed: &[String],
        added: &Tags,
    ) -> Result<(), ApiError> {
        if !removed.is_empty() {
            let mut params = flag("--resource-arn", arn).to_vec();
            params.push("--tag-keys".to_string());
            params.extend(removed.iter().cloned());
            self.call(ctx, "untag-resource", params).await?;
        }
        if !added.is_empty() {
            let mut params = flag("--resource-arn", arn).to_vec();
            params.extend(flag("--tags", &tags_json(added)?));
            self.call(ctx, "tag-resource", params).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SUBNET_GROUP_NOT_FOUND_FAULT;

    #[test]
    fn test_parse_cli_error_not_found() {
        let stderr = "\nAn error occurred (SubnetGroupNotFoundFault) when calling the \
                      DescribeSubnetGroups operation: Subnet group cache-a not found.\n";
        let err = parse_cli_error(stderr);
        assert_eq!(err.code(), Some(SUBNET_GROUP_NOT_FOUND_FAULT));
        assert!(err.is_not_found());
        assert_eq!(
            err,
            ApiError::service(SUBNET_GROUP_NOT_FOUND_FAULT, "Subnet group cache-a not found.")
        );
    }

    #[test]
    fn test_parse_cli_error_other() {
        let err = parse_cli_error("Unable to locate credentials.");
        assert_eq!(
            err,
            ApiError::Command("Unable to locate credentials.".to_string())
        );
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_args_region_profile() {
        let client = AwsCliClient::new(&ProviderConfig {
            region: Some("eu-west-1".to_string()),
            profile: Some("ops".to_string()),
            ..Default::default()
        });
        let args = client.args("list-tags", flag("--resource-arn", "arn:x").to_vec());
        assert_eq!(
            args,
            vec![
                "memorydb",
                "list-tags",
                "--resource-arn",
                "arn:x",
                "--output",
                "json",
                "--region",
                "eu-west-1",
                "--profile",
                "ops"
            ]
        );
    }

    #[test]
    fn test_parse_describe_output() {
        let json = r#"{
            "SubnetGroups": [{
                "Name": "cache-a",
                "Description": "Managed externally",
                "VpcId": "vpc-1",
                "Subnets": [{"Identifier": "subnet-a", "AvailabilityZone": {"Name": "eu-west-1a"}}],
                "ARN": "arn:aws:memorydb:eu-west-1:000000000000:subnetgroup/cache-a"
            }]
        }"#;
        let page: DescribeSubnetGroupsOutput =
            parse_output("describe-subnet-groups", json).expect("Error parsing output");
        assert_eq!(page.next_token, None);
        assert_eq!(page.subnet_groups.len(), 1);
        assert_eq!(page.subnet_groups[0].subnet_ids(), vec!["subnet-a"]);
    }

    #[test]
    fn test_parse_output_reports_path() {
        let json = r#"{"SubnetGroups": [{"Name": 7}]}"#;
        let err = parse_output::<DescribeSubnetGroupsOutput>("describe-subnet-groups", json)
            .expect_err("Name must be a string");
        match err {
            ApiError::Parse(msg) => assert!(msg.contains("SubnetGroups[0].Name"), "{msg}"),
            other => panic!("Unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_parse_tag_list() {
        let json = r#"{"TagList": [{"Key": "env", "Value": "prod"}, {"Key": "aws:x", "Value": "y"}]}"#;
        let parsed: TagListOutput = parse_output("list-tags", json).expect("Error parsing tags");
        let tags = Tag::into_tags(parsed.tag_list);
        assert_eq!(tags.get("env").map(String::as_str), Some("prod"));
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_tags_json() {
        let tags: Tags = [("env".to_string(), "a,b".to_string())].into_iter().collect();
        assert_eq!(
            tags_json(&tags).expect("Error serializing"),
            r#"[{"Key":"env","Value":"a,b"}]"#
        );
    }
}
