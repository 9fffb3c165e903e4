use super::{HookConfig, LogFormat, NamingConvention, RetentionDays, RetentionSpec};
use anyhow::{anyhow, Context, Result};

pub const ENV_PREFIX: &str = "APIGW_RETENTION_";

/// Abstraction over environment-variable lookups so tests can supply
/// their own source of overrides.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the APIGW_RETENTION_ prefix
    /// Used for proxy variables and other conventional names
    fn get_raw(&self, key: &str) -> Option<String>;
}

impl EnvSource for std::collections::HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        std::collections::HashMap::get(self, &format!("{}{}", ENV_PREFIX, key)).cloned()
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        std::collections::HashMap::get(self, key).cloned()
    }
}

/// Apply environment-variable overrides (highest priority) to the hook config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut HookConfig, env: &E) -> Result<()> {
    // Deployment
    if let Some(service) = get_env_string(env, "SERVICE")? {
        config.deployment.service = service;
    }
    if let Some(stage) = get_env_string(env, "STAGE")? {
        config.deployment.stage = stage;
    }
    if let Some(region) = get_env_string(env, "REGION")? {
        config.deployment.region = region;
    }
    if let Some(naming) = get_env_string(env, "NAMING")? {
        config.deployment.naming = naming
            .parse::<NamingConvention>()
            .context("Invalid APIGW_RETENTION_NAMING value")?;
    }

    // Provider credentials
    if let Some(profile) = get_env_string(env, "PROFILE")? {
        config.provider.profile = if profile.is_empty() {
            None
        } else {
            Some(profile)
        };
    }

    // Retention branches
    apply_retention_overrides(&mut config.access_logging, env, "ACCESS_LOG")?;
    apply_retention_overrides(&mut config.execution_logging, env, "EXECUTION_LOG")?;

    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL")? {
        config.log.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT")? {
        config.log.format = match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
    }

    Ok(())
}

fn apply_retention_overrides<E: EnvSource>(
    spec: &mut RetentionSpec,
    env: &E,
    branch: &str,
) -> Result<()> {
    if let Some(enabled) = get_env_bool(env, &format!("{}_ENABLED", branch))? {
        spec.enabled = enabled;
    }
    if let Some(days) = get_env_string(env, &format!("{}_DAYS", branch))? {
        let parsed = days
            .parse::<RetentionDays>()
            .with_context(|| format!("Failed to parse {}{}_DAYS", ENV_PREFIX, branch))?;
        spec.days = Some(parsed);
    }
    Ok(())
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Result<Option<String>> {
    Ok(env.get(key))
}

fn get_env_bool<E: EnvSource>(env: &E, key: &str) -> Result<Option<bool>> {
    match get_env_string(env, key)? {
        Some(val) => {
            let parsed = val.to_lowercase().parse::<bool>().map_err(|e| {
                anyhow!(
                    "Failed to parse {}{} (expected bool): {}",
                    ENV_PREFIX,
                    key,
                    e
                )
            })?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_deployment_overrides() {
        let mut config = HookConfig::default();
        let source = env(&[
            ("APIGW_RETENTION_SERVICE", "orders"),
            ("APIGW_RETENTION_STAGE", "prod"),
            ("APIGW_RETENTION_REGION", "ap-southeast-2"),
            ("APIGW_RETENTION_NAMING", "service-first"),
            ("APIGW_RETENTION_PROFILE", "deployer"),
        ]);

        apply_env_overrides(&mut config, &source).unwrap();

        assert_eq!(config.deployment.api_name(), "orders-prod");
        assert_eq!(config.deployment.region, "ap-southeast-2");
        assert_eq!(config.provider.profile.as_deref(), Some("deployer"));
    }

    #[test]
    fn test_retention_overrides() {
        let mut config = HookConfig::default();
        let source = env(&[
            ("APIGW_RETENTION_ACCESS_LOG_ENABLED", "TRUE"),
            ("APIGW_RETENTION_ACCESS_LOG_DAYS", "14"),
            ("APIGW_RETENTION_EXECUTION_LOG_ENABLED", "true"),
            ("APIGW_RETENTION_EXECUTION_LOG_DAYS", "never expire"),
        ]);

        apply_env_overrides(&mut config, &source).unwrap();

        assert_eq!(
            config.access_logging,
            RetentionSpec::enabled(RetentionDays::Days(14))
        );
        assert_eq!(
            config.execution_logging,
            RetentionSpec::enabled(RetentionDays::NeverExpire)
        );
    }

    #[test]
    fn test_unprefixed_variables_are_ignored() {
        let mut config = HookConfig::default();
        let source = env(&[("STAGE", "prod"), ("ACCESS_LOG_ENABLED", "true")]);

        apply_env_overrides(&mut config, &source).unwrap();

        assert_eq!(config.deployment.stage, "dev");
        assert!(!config.access_logging.enabled);
    }

    #[test]
    fn test_invalid_values_fail() {
        let mut config = HookConfig::default();
        let bad_bool = env(&[("APIGW_RETENTION_ACCESS_LOG_ENABLED", "yes please")]);
        assert!(apply_env_overrides(&mut config, &bad_bool).is_err());

        let bad_days = env(&[("APIGW_RETENTION_EXECUTION_LOG_DAYS", "a while")]);
        assert!(apply_env_overrides(&mut config, &bad_days).is_err());
    }
}
