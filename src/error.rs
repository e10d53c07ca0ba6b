//! Error types for the subnet group reconciler.

use itertools::Itertools;
use std::fmt;
use thiserror::Error;

/// Error code MemoryDB returns for a subnet group that does not exist.
pub const SUBNET_GROUP_NOT_FOUND_FAULT: &str = "SubnetGroupNotFoundFault";

/// A field failed a constraint before any API call was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {constraint}")]
pub struct ValidationError {
    pub field: &'static str,
    pub constraint: String,
}

impl ValidationError {
    pub fn new(field: &'static str, constraint: impl Into<String>) -> Self {
        ValidationError {
            field,
            constraint: constraint.into(),
        }
    }
}

/// Failure reported by a [`crate::client::SubnetGroupApi`] call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The service answered with an error code.
    #[error("{code}: {message}")]
    Service { code: String, message: String },

    /// A lookup by name matched nothing.
    #[error("no subnet group matched {0}")]
    EmptyResult(String),

    /// The client could not run the request.
    #[error("request failed: {0}")]
    Command(String),

    /// The response could not be parsed.
    #[error("error parsing response: {0}")]
    Parse(String),

    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    pub fn service(code: &str, message: impl Into<String>) -> Self {
        ApiError::Service {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Service { code, .. } => Some(code.as_str()),
            _ => None,
        }
    }

    /// Empty lookups and the not-found fault mean the same thing.
    pub fn is_not_found(&self) -> bool {
        match self {
            ApiError::EmptyResult(_) => true,
            ApiError::Service { code, .. } => code == SUBNET_GROUP_NOT_FOUND_FAULT,
            _ => false,
        }
    }
}

/// Sub-operation of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    SubnetGroup,
    Tags,
}

impl fmt::Display for UpdateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateOp::SubnetGroup => f.write_str("subnet group"),
            UpdateOp::Tags => f.write_str("tags"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateFailure {
    pub op: UpdateOp,
    pub source: ApiError,
}

fn format_failures(failures: &[UpdateFailure]) -> String {
    if failures.is_empty() {
        return String::new();
    }
    let joined = failures
        .iter()
        .map(|f| format!("{} update failed: {}", f.op, f.source))
        .join("; ");
    format!(": {joined}")
}

/// Every failed sub-operation of one update.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("error updating MemoryDB Subnet Group ({id}){}", format_failures(.failures))]
pub struct UpdateError {
    pub id: String,
    pub failures: Vec<UpdateFailure>,
}

/// Errors surfaced to the orchestrator.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("error creating MemoryDB Subnet Group ({name}): {source}")]
    Create { name: String, source: ApiError },

    /// Lookup or tag listing failed for a reason other than not-found.
    #[error("error reading MemoryDB Subnet Group ({id}): {source}")]
    Read { id: String, source: ApiError },

    #[error("error reading MemoryDB Subnet Group ({id}): not found after creation")]
    NotFoundAfterCreate { id: String },

    #[error(transparent)]
    Update(#[from] UpdateError),

    #[error("error deleting MemoryDB Subnet Group ({id}): {source}")]
    Delete { id: String, source: ApiError },

    #[error("MemoryDB Subnet Group ({id}) must be replaced: {field} changed")]
    RequiresReplacement { id: String, field: &'static str },

    #[error("invalid resource state: {0}")]
    InvalidState(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(ApiError::EmptyResult("g".to_string()).is_not_found());
        assert!(ApiError::service(SUBNET_GROUP_NOT_FOUND_FAULT, "gone").is_not_found());
        assert!(!ApiError::service("InvalidParameterValueException", "bad").is_not_found());
        assert!(!ApiError::Cancelled.is_not_found());
    }

    #[test]
    fn test_update_error_lists_every_failure() {
        let err = UpdateError {
            id: "g".to_string(),
            failures: vec![
                UpdateFailure {
                    op: UpdateOp::SubnetGroup,
                    source: ApiError::service("InvalidSubnet", "bad subnet"),
                },
                UpdateFailure {
                    op: UpdateOp::Tags,
                    source: ApiError::Command("timeout".to_string()),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "error updating MemoryDB Subnet Group (g): subnet group update failed: \
             InvalidSubnet: bad subnet; tags update failed: request failed: timeout"
        );
        let single = UpdateError {
            id: "g".to_string(),
            failures: vec![UpdateFailure {
                op: UpdateOp::Tags,
                source: ApiError::Cancelled,
            }],
        };
        assert_eq!(
            single.to_string(),
            "error updating MemoryDB Subnet Group (g): tags update failed: request cancelled"
        );
    }
}
