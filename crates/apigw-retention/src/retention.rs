//! Apply a retention policy to a single log group

use apigw_retention_config::RetentionDays;
use tracing::debug;

use crate::backend::LogsBackend;
use crate::error::RemoteError;

/// Log group paired with the retention it should carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogGroupTarget {
    pub name: String,
    pub retention: RetentionDays,
}

impl LogGroupTarget {
    pub fn new(name: impl Into<String>, retention: RetentionDays) -> Self {
        Self {
            name: name.into(),
            retention,
        }
    }
}

/// Issue exactly one CloudWatch call: a finite policy is put, "never expire"
/// deletes whatever policy exists.
pub async fn apply_retention(
    logs: &dyn LogsBackend,
    target: &LogGroupTarget,
) -> Result<(), RemoteError> {
    match target.retention {
        RetentionDays::Days(days) => {
            debug!(log_group = %target.name, days, "putting retention policy");
            logs.put_retention_policy(&target.name, days).await
        }
        RetentionDays::NeverExpire => {
            debug!(log_group = %target.name, "deleting retention policy");
            logs.delete_retention_policy(&target.name).await
        }
    }
}

/// Deterministic execution log group API Gateway writes to.
pub fn execution_log_group_name(rest_api_id: &str, stage: &str) -> String {
    format!("API-Gateway-Execution-Logs_{}/{}", rest_api_id, stage)
}
