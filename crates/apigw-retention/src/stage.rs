//! Access log group discovery from a stage's logging settings

use crate::backend::ApiGatewayBackend;
use crate::error::RetentionError;

const LOG_GROUP_TOKEN: &str = "log-group:";

/// Name of the CloudWatch log group receiving the stage's access logs.
pub async fn access_log_group_name(
    backend: &dyn ApiGatewayBackend,
    rest_api_id: &str,
    stage_name: &str,
) -> Result<String, RetentionError> {
    let settings = backend.get_stage(rest_api_id, stage_name).await?;

    let destination_arn = settings
        .destination_arn
        .filter(|arn| !arn.is_empty())
        .ok_or_else(|| RetentionError::AccessLogNotConfigured {
            rest_api_id: rest_api_id.to_string(),
            stage: stage_name.to_string(),
        })?;

    log_group_from_destination_arn(&destination_arn)
        .map(str::to_string)
        .ok_or(RetentionError::UnsupportedDestination { destination_arn })
}

/// Text between the first `log-group:` token and the next one (or the end).
///
/// `arn:aws:logs:us-east-1:123456789012:log-group:/my/group:*` yields
/// `/my/group:*`.
pub fn log_group_from_destination_arn(destination_arn: &str) -> Option<&str> {
    destination_arn
        .split(LOG_GROUP_TOKEN)
        .nth(1)
        .filter(|name| !name.is_empty())
}
