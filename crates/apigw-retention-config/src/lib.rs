// apigw-retention-config - Configuration for the API Gateway log retention hook
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Explicit config file path (CLI --config)
// 3. Config file path from APIGW_RETENTION_CONFIG env var
// 4. Config file contents from APIGW_RETENTION_CONFIG_CONTENT env var
// 5. Default config file locations (./apigw-retention.toml, ./.apigw-retention.toml)
// 6. Built-in defaults (lowest priority)
//
// CLI flags are layered on top by the binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

mod env_overrides;
mod retention;
mod sources;
mod transport;
mod validation;

pub use env_overrides::{EnvSource, ENV_PREFIX};
pub use retention::{RetentionDays, CLOUDWATCH_RETENTION_DAYS};
pub use sources::StdEnvSource;
pub use transport::{TransportConfig, PROXY_ENV_VARS};

/// Complete hook configuration, resolved once at entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookConfig {
    #[serde(default)]
    pub deployment: DeploymentConfig,

    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub access_logging: RetentionSpec,

    #[serde(default)]
    pub execution_logging: RetentionSpec,

    #[serde(default)]
    pub log: LogConfig,
}

/// Identifies the deployed service and the API Gateway it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub service: String,
    #[serde(default = "default_stage")]
    pub stage: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub naming: NamingConvention,
}

fn default_stage() -> String {
    "dev".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            service: String::new(),
            stage: default_stage(),
            region: default_region(),
            naming: NamingConvention::default(),
        }
    }
}

impl DeploymentConfig {
    /// Name the REST API is expected to carry in API Gateway.
    pub fn api_name(&self) -> String {
        match self.naming {
            NamingConvention::ServiceFirst => format!("{}-{}", self.service, self.stage),
            NamingConvention::StageFirst => format!("{}-{}", self.stage, self.service),
        }
    }
}

/// Order of service and stage in the REST API name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NamingConvention {
    /// `{service}-{stage}`
    ServiceFirst,
    /// `{stage}-{service}`
    #[default]
    StageFirst,
}

impl std::fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamingConvention::ServiceFirst => write!(f, "service-first"),
            NamingConvention::StageFirst => write!(f, "stage-first"),
        }
    }
}

impl std::str::FromStr for NamingConvention {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "service-first" | "service" => Ok(NamingConvention::ServiceFirst),
            "stage-first" | "stage" => Ok(NamingConvention::StageFirst),
            _ => anyhow::bail!(
                "Unsupported naming convention: {}. Supported: service-first, stage-first",
                s
            ),
        }
    }
}

/// Credential settings from the deployment provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

/// Retention policy for one kind of API Gateway log group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionSpec {
    #[serde(default)]
    pub enabled: bool,
    /// Only read when `enabled` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<RetentionDays>,
}

impl RetentionSpec {
    pub fn enabled(days: RetentionDays) -> Self {
        Self {
            enabled: true,
            days: Some(days),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }
}

/// Logging output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl HookConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        let config = sources::load_config()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path (for CLI usage).
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let config = sources::load_from_file_path(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Layer every source without validating, for callers that still apply
    /// their own overrides (e.g. CLI flags) before calling `validate`.
    pub fn load_unvalidated(path: Option<&std::path::Path>) -> Result<Self> {
        match path {
            Some(path) => sources::load_from_file_path(path),
            None => sources::load_config(),
        }
    }

    /// Parse inline TOML and layer overrides from a custom env source on top.
    pub fn load_with_env<E: EnvSource>(inline_config: Option<&str>, env: &E) -> Result<Self> {
        let mut config = HookConfig::default();

        if let Some(inline) = inline_config {
            let file_config: HookConfig =
                toml::from_str(inline).context("Failed to parse inline config content")?;
            config.merge(file_config);
        }

        config.apply_env_overrides_from(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge another config into this one (used for TOML layering).
    pub fn merge(&mut self, other: HookConfig) {
        self.deployment = other.deployment;
        self.access_logging = other.access_logging;
        self.execution_logging = other.execution_logging;
        self.log = other.log;

        if other.provider.profile.is_some() {
            self.provider = other.provider;
        }
    }

    /// Apply environment overrides from a custom source.
    pub fn apply_env_overrides_from<E: EnvSource>(&mut self, env: &E) -> Result<()> {
        env_overrides::apply_env_overrides(self, env)
    }

    /// True when neither log kind is managed; the hook then makes no remote calls.
    pub fn is_noop(&self) -> bool {
        !self.access_logging.enabled && !self.execution_logging.enabled
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}
