// Thin adapters over the AWS SDK clients.
//
// The hook only talks to AWS through these traits so tests can substitute
// in-memory fakes that record every call.

use async_trait::async_trait;
use aws_sdk_apigateway::error::DisplayErrorContext;
use aws_sdk_cloudwatchlogs::{
    error::SdkError,
    operation::{
        delete_retention_policy::DeleteRetentionPolicyError,
        put_retention_policy::PutRetentionPolicyError,
    },
};

use crate::error::RemoteError;

/// Largest page API Gateway returns for `GetRestApis`.
pub const REST_API_PAGE_LIMIT: i32 = 500;

/// Identifier and name of one REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestApiSummary {
    pub id: String,
    pub name: String,
}

/// One page of `GetRestApis`; `position` is absent on the last page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestApiPage {
    pub items: Vec<RestApiSummary>,
    pub position: Option<String>,
}

/// Logging settings of a deployed stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageLogSettings {
    pub destination_arn: Option<String>,
}

#[async_trait]
pub trait ApiGatewayBackend: Send + Sync {
    async fn get_rest_apis(
        &self,
        position: Option<String>,
        limit: i32,
    ) -> Result<RestApiPage, RemoteError>;

    async fn get_stage(
        &self,
        rest_api_id: &str,
        stage_name: &str,
    ) -> Result<StageLogSettings, RemoteError>;
}

#[async_trait]
pub trait LogsBackend: Send + Sync {
    async fn put_retention_policy(&self, log_group: &str, days: u32) -> Result<(), RemoteError>;

    /// Succeeds whether or not the group had a policy.
    async fn delete_retention_policy(&self, log_group: &str) -> Result<(), RemoteError>;
}

#[async_trait]
impl ApiGatewayBackend for aws_sdk_apigateway::Client {
    async fn get_rest_apis(
        &self,
        position: Option<String>,
        limit: i32,
    ) -> Result<RestApiPage, RemoteError> {
        let output = self
            .get_rest_apis()
            .set_position(position)
            .limit(limit)
            .send()
            .await
            .map_err(|e| RemoteError::call("GetRestApis", DisplayErrorContext(&e).to_string()))?;

        // APIs without an id or name cannot match and are dropped
        let items = output
            .items()
            .iter()
            .filter_map(|api| {
                Some(RestApiSummary {
                    id: api.id()?.to_string(),
                    name: api.name()?.to_string(),
                })
            })
            .collect();

        Ok(RestApiPage {
            items,
            position: output.position().map(str::to_string),
        })
    }

    async fn get_stage(
        &self,
        rest_api_id: &str,
        stage_name: &str,
    ) -> Result<StageLogSettings, RemoteError> {
        let output = self
            .get_stage()
            .rest_api_id(rest_api_id)
            .stage_name(stage_name)
            .send()
            .await
            .map_err(|e| RemoteError::call("GetStage", DisplayErrorContext(&e).to_string()))?;

        Ok(StageLogSettings {
            destination_arn: output
                .access_log_settings()
                .and_then(|settings| settings.destination_arn())
                .map(str::to_string),
        })
    }
}

#[async_trait]
impl LogsBackend for aws_sdk_cloudwatchlogs::Client {
    async fn put_retention_policy(&self, log_group: &str, days: u32) -> Result<(), RemoteError> {
        let retention_in_days = i32::try_from(days).map_err(|_| {
            RemoteError::call("PutRetentionPolicy", format!("{} days is out of range", days))
        })?;

        self.put_retention_policy()
            .log_group_name(log_group)
            .retention_in_days(retention_in_days)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| match err {
                SdkError::ServiceError(se) => match se.err() {
                    PutRetentionPolicyError::ResourceNotFoundException(_) => {
                        RemoteError::LogGroupNotFound {
                            log_group: log_group.to_string(),
                        }
                    }
                    other => RemoteError::call(
                        "PutRetentionPolicy",
                        DisplayErrorContext(other).to_string(),
                    ),
                },
                other => RemoteError::call(
                    "PutRetentionPolicy",
                    DisplayErrorContext(&other).to_string(),
                ),
            })
    }

    async fn delete_retention_policy(&self, log_group: &str) -> Result<(), RemoteError> {
        self.delete_retention_policy()
            .log_group_name(log_group)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| match err {
                SdkError::ServiceError(se) => match se.err() {
                    DeleteRetentionPolicyError::ResourceNotFoundException(_) => {
                        RemoteError::LogGroupNotFound {
                            log_group: log_group.to_string(),
                        }
                    }
                    other => RemoteError::call(
                        "DeleteRetentionPolicy",
                        DisplayErrorContext(other).to_string(),
                    ),
                },
                other => RemoteError::call(
                    "DeleteRetentionPolicy",
                    DisplayErrorContext(&other).to_string(),
                ),
            })
    }
}
