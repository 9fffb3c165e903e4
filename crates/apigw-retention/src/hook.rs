//! Post-deployment orchestration: resolve the REST API once, then manage
//! access and execution log retention as independent branches.

use std::sync::Arc;

use apigw_retention_config::{DeploymentConfig, RetentionDays, RetentionSpec};
use tracing::{error, info};

use crate::backend::{ApiGatewayBackend, LogsBackend};
use crate::error::{HookError, RetentionError, LOG_PREFIX};
use crate::locator::locate_rest_api;
use crate::retention::{apply_retention, execution_log_group_name, LogGroupTarget};
use crate::stage::access_log_group_name;

/// Whether retention calls are issued or only reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HookMode {
    #[default]
    Apply,
    /// Resolve every log group but never change a policy
    Plan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogKind {
    Access,
    Execution,
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogKind::Access => write!(f, "access"),
            LogKind::Execution => write!(f, "execution"),
        }
    }
}

/// Terminal state of one log kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchOutcome {
    Skipped,
    Applied(LogGroupTarget),
    Planned(LogGroupTarget),
    Failed(RetentionError),
}

impl BranchOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, BranchOutcome::Failed(_))
    }

    pub fn target(&self) -> Option<&LogGroupTarget> {
        match self {
            BranchOutcome::Applied(target) | BranchOutcome::Planned(target) => Some(target),
            BranchOutcome::Skipped | BranchOutcome::Failed(_) => None,
        }
    }
}

/// What happened to each log kind during one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookReport {
    pub rest_api_id: Option<String>,
    pub access: BranchOutcome,
    pub execution: BranchOutcome,
}

impl HookReport {
    fn skipped() -> Self {
        Self {
            rest_api_id: None,
            access: BranchOutcome::Skipped,
            execution: BranchOutcome::Skipped,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.access.is_failed() || self.execution.is_failed()
    }

    /// One line per failed branch, in branch order.
    pub fn failure_messages(&self) -> Vec<String> {
        [(LogKind::Access, &self.access), (LogKind::Execution, &self.execution)]
            .into_iter()
            .filter_map(|(kind, outcome)| match outcome {
                BranchOutcome::Failed(err) => Some(failure_message(kind, err)),
                _ => None,
            })
            .collect()
    }
}

fn failure_message(kind: LogKind, err: &RetentionError) -> String {
    format!(
        "{} - ERROR: Failed to set ApiGateway {} log retention. {}",
        LOG_PREFIX, kind, err
    )
}

fn describe_retention(retention: RetentionDays) -> String {
    match retention {
        RetentionDays::Days(days) => format!("{} days", days),
        RetentionDays::NeverExpire => "never expire".to_string(),
    }
}

/// Runs once per deployment against a single set of AWS clients.
pub struct RetentionHook {
    apigateway: Arc<dyn ApiGatewayBackend>,
    logs: Arc<dyn LogsBackend>,
    mode: HookMode,
}

impl RetentionHook {
    pub fn new(apigateway: Arc<dyn ApiGatewayBackend>, logs: Arc<dyn LogsBackend>) -> Self {
        Self {
            apigateway,
            logs,
            mode: HookMode::Apply,
        }
    }

    pub fn with_mode(mut self, mode: HookMode) -> Self {
        self.mode = mode;
        self
    }

    /// Manage retention for every enabled log kind.
    ///
    /// Does nothing, remotely or otherwise, when both kinds are disabled. A
    /// failed lookup of the REST API aborts the run. Otherwise both kinds are
    /// attempted and any failure is returned together with the full report.
    pub async fn run(
        &self,
        deployment: &DeploymentConfig,
        access_logging: &RetentionSpec,
        execution_logging: &RetentionSpec,
    ) -> Result<HookReport, HookError> {
        if !access_logging.enabled && !execution_logging.enabled {
            info!(
                "{} - Access and execution log retention are disabled, skipping.",
                LOG_PREFIX
            );
            return Ok(HookReport::skipped());
        }

        let api_name = deployment.api_name();
        let rest_api_id = match locate_rest_api(self.apigateway.as_ref(), &api_name).await {
            Ok(id) => id,
            Err(err) => {
                let err = HookError::RestApiLookup(err);
                error!("{}", err);
                return Err(err);
            }
        };
        info!(rest_api_id = %rest_api_id, api_name = %api_name, "resolved rest api");

        let access = if access_logging.enabled {
            let result = self
                .access_branch(&rest_api_id, &deployment.stage, access_logging.days)
                .await;
            self.finish(LogKind::Access, result)
        } else {
            BranchOutcome::Skipped
        };

        let execution = if execution_logging.enabled {
            let result = self
                .execution_branch(&rest_api_id, &deployment.stage, execution_logging.days)
                .await;
            self.finish(LogKind::Execution, result)
        } else {
            BranchOutcome::Skipped
        };

        let report = HookReport {
            rest_api_id: Some(rest_api_id),
            access,
            execution,
        };

        if report.has_failures() {
            Err(HookError::BranchesFailed(Box::new(report)))
        } else {
            Ok(report)
        }
    }

    async fn access_branch(
        &self,
        rest_api_id: &str,
        stage: &str,
        days: Option<RetentionDays>,
    ) -> Result<LogGroupTarget, RetentionError> {
        let retention = days.ok_or(RetentionError::RetentionNotSet)?;
        let name = access_log_group_name(self.apigateway.as_ref(), rest_api_id, stage).await?;
        self.update(LogGroupTarget::new(name, retention)).await
    }

    async fn execution_branch(
        &self,
        rest_api_id: &str,
        stage: &str,
        days: Option<RetentionDays>,
    ) -> Result<LogGroupTarget, RetentionError> {
        let retention = days.ok_or(RetentionError::RetentionNotSet)?;
        let name = execution_log_group_name(rest_api_id, stage);
        self.update(LogGroupTarget::new(name, retention)).await
    }

    async fn update(&self, target: LogGroupTarget) -> Result<LogGroupTarget, RetentionError> {
        if self.mode == HookMode::Apply {
            apply_retention(self.logs.as_ref(), &target).await?;
        }
        Ok(target)
    }

    fn finish(
        &self,
        kind: LogKind,
        result: Result<LogGroupTarget, RetentionError>,
    ) -> BranchOutcome {
        match (result, self.mode) {
            (Ok(target), HookMode::Apply) => {
                info!(
                    "{} - Successfully set ApiGateway {} log ({}) retention to {}.",
                    LOG_PREFIX,
                    kind,
                    target.name,
                    describe_retention(target.retention)
                );
                BranchOutcome::Applied(target)
            }
            (Ok(target), HookMode::Plan) => {
                info!(
                    "{} - Would set ApiGateway {} log ({}) retention to {}.",
                    LOG_PREFIX,
                    kind,
                    target.name,
                    describe_retention(target.retention)
                );
                BranchOutcome::Planned(target)
            }
            (Err(err), _) => {
                error!("{}", failure_message(kind, &err));
                BranchOutcome::Failed(err)
            }
        }
    }
}
