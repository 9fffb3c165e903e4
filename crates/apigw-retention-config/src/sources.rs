// Configuration source loading.
//
// Priority order:
// 1. Environment variables (APIGW_RETENTION_* prefix)
// 2. Config file path from APIGW_RETENTION_CONFIG
// 3. Inline config content from APIGW_RETENTION_CONFIG_CONTENT
// 4. Default config files (./apigw-retention.toml, ./.apigw-retention.toml)
// 5. Built-in defaults

use crate::env_overrides::{self, EnvSource, ENV_PREFIX};
use crate::*;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

const DEFAULT_CONFIG_FILES: &[&str] = &["./apigw-retention.toml", "./.apigw-retention.toml"];

/// Layer defaults, the first config file found, and environment overrides.
/// Validation is left to the caller so CLI flags can be applied first.
pub fn load_config() -> Result<HookConfig> {
    let mut config = HookConfig::default();

    if let Some(file_config) = load_from_file()? {
        config.merge(file_config);
    }

    let env_source = StdEnvSource;
    env_overrides::apply_env_overrides(&mut config, &env_source)?;
    Ok(config)
}

fn load_from_file() -> Result<Option<HookConfig>> {
    if let Ok(path) = env::var(format!("{}CONFIG", ENV_PREFIX)) {
        return parse_file(Path::new(&path)).map(Some);
    }

    if let Ok(content) = env::var(format!("{}CONFIG_CONTENT", ENV_PREFIX)) {
        let config: HookConfig = toml::from_str(&content)
            .context("Failed to parse inline config from APIGW_RETENTION_CONFIG_CONTENT")?;
        return Ok(Some(config));
    }

    for path in DEFAULT_CONFIG_FILES {
        let path = Path::new(path);
        if path.exists() {
            return parse_file(path).map(Some);
        }
    }

    Ok(None)
}

fn parse_file(path: &Path) -> Result<HookConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Load configuration from a specific file path (for CLI --config flag).
/// Returns error if file doesn't exist or can't be parsed.
pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<HookConfig> {
    let file_config = parse_file(path.as_ref())?;

    let mut config = HookConfig::default();
    config.merge(file_config);

    let env_source = StdEnvSource;
    env_overrides::apply_env_overrides(&mut config, &env_source)?;
    Ok(config)
}

/// Reads from the process environment.
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }

    fn get_raw(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}
