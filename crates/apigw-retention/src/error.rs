//! Error types for the log retention hook

use thiserror::Error;

use crate::hook::HookReport;

/// Prefix carried by every user-facing line the hook emits.
pub const LOG_PREFIX: &str = "apigw-log-retention";

/// A rejected or failed call to an AWS API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The log group named in a retention call does not exist
    #[error("Log group does not exist: {log_group}")]
    LogGroupNotFound { log_group: String },

    /// Any other service or transport failure
    #[error("{operation} failed: {reason}")]
    Call {
        operation: &'static str,
        reason: String,
    },
}

impl RemoteError {
    pub fn call(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Call {
            operation,
            reason: reason.into(),
        }
    }
}

/// Failures of the individual lookup and update steps
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetentionError {
    /// No REST API carries the expected name
    #[error("Api {api_name} does not exist.")]
    ApiNotFound { api_name: String },

    /// The stage has no access log destination
    #[error("Access log destination ARN not set for stage '{stage}' of rest api {rest_api_id}! Please check access logging is enabled and destination ARN is configured in ApiGateway > stage > Logs/Tracing.")]
    AccessLogNotConfigured { rest_api_id: String, stage: String },

    /// The destination is not a CloudWatch Logs log group (e.g. a Firehose stream)
    #[error("Access log destination {destination_arn} is not a CloudWatch Logs log group. Only log group destinations can have a retention policy.")]
    UnsupportedDestination { destination_arn: String },

    /// The branch is enabled but carries no day count
    #[error("Retention days are not configured.")]
    RetentionNotSet,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

/// Run-level failure surfaced to the caller of the hook
#[derive(Debug, Error)]
pub enum HookError {
    /// The REST API could not be resolved, so neither log kind was attempted
    #[error("apigw-log-retention - ERROR: Failed to retrieve rest api id. {0}")]
    RestApiLookup(#[source] RetentionError),

    /// At least one log kind failed; the report holds every branch outcome
    #[error("{}", failure_summary(.0))]
    BranchesFailed(Box<HookReport>),
}

fn failure_summary(report: &HookReport) -> String {
    report.failure_messages().join("\n")
}
