// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::*;
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &HookConfig) -> Result<()> {
    validate_log_config(&config.log)?;

    // Nothing else is read when both branches are off
    if config.is_noop() {
        return Ok(());
    }

    validate_deployment_config(&config.deployment)?;
    validate_retention_spec("access_logging", &config.access_logging)?;
    validate_retention_spec("execution_logging", &config.execution_logging)?;

    Ok(())
}

fn validate_deployment_config(config: &DeploymentConfig) -> Result<()> {
    if config.service.is_empty() {
        bail!("deployment.service is required");
    }

    if config.stage.is_empty() {
        bail!("deployment.stage must not be empty");
    }

    if config.region.is_empty() {
        bail!("deployment.region must not be empty");
    }

    Ok(())
}

fn validate_retention_spec(section: &str, spec: &RetentionSpec) -> Result<()> {
    if !spec.enabled {
        return Ok(());
    }

    let Some(days) = spec.days else {
        bail!("{}.days is required when {}.enabled is true", section, section);
    };

    if !days.is_supported() {
        warn!(
            section,
            days = %days,
            supported = ?CLOUDWATCH_RETENTION_DAYS,
            "retention is not a value CloudWatch Logs accepts; the update will likely be rejected"
        );
    }

    Ok(())
}

fn validate_log_config(config: &LogConfig) -> Result<()> {
    if config.level.is_empty() {
        bail!("log.level must not be empty");
    }

    Ok(())
}
