use anyhow::{Context, Result};
use apigw_log_retention::{init_backends, init_tracing, load_sdk_config, HookMode, RetentionHook};
use apigw_retention_config::{HookConfig, StdEnvSource, TransportConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

/// Apply CloudWatch retention to API Gateway access and execution logs
#[derive(Parser)]
#[command(name = "apigw-log-retention")]
#[command(version)]
#[command(about = "Apply CloudWatch retention to API Gateway access and execution logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Service name the REST API is named after (overrides config file)
    #[arg(long, value_name = "NAME", global = true)]
    service: Option<String>,

    /// Deployment stage (overrides config file)
    #[arg(short, long, value_name = "STAGE", global = true)]
    stage: Option<String>,

    /// AWS region (overrides config file)
    #[arg(short, long, value_name = "REGION", global = true)]
    region: Option<String>,

    /// Named AWS credential profile (overrides config file)
    #[arg(long, value_name = "PROFILE", global = true)]
    profile: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set retention on the configured log groups (default if no subcommand given)
    Apply,
    /// Resolve the log groups and print what would change, without changing it
    Plan,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mode = match cli.command {
        Some(Commands::Plan) => HookMode::Plan,
        Some(Commands::Apply) | None => HookMode::Apply,
    };

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(async_main(cli, mode))
}

async fn async_main(cli: Cli, mode: HookMode) -> Result<()> {
    // Step 1: Load base configuration
    let mut config = match &cli.config {
        Some(config_path) => HookConfig::load_unvalidated(Some(config_path.as_path()))
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?,
        None => HookConfig::load_unvalidated(None).context("Failed to load configuration")?,
    };

    // Step 2: Apply CLI overrides (highest priority)
    apply_cli_overrides(&mut config, &cli);

    // Step 3: Initialize tracing early so validation warnings show up
    init_tracing(&config.log);
    config.validate().context("Invalid configuration")?;

    // Step 4: Nothing enabled means no AWS clients and no calls at all
    if config.is_noop() {
        info!("apigw-log-retention - Access and execution log retention are disabled, skipping.");
        return Ok(());
    }

    // Step 5: One transport/credential configuration for every client
    let transport = TransportConfig::resolve(&StdEnvSource, &config.provider);
    let sdk_config = load_sdk_config(&config.deployment.region, &transport).await?;
    let (apigateway, logs) = init_backends(&sdk_config);

    info!(
        api_name = %config.deployment.api_name(),
        stage = %config.deployment.stage,
        region = %config.deployment.region,
        naming = %config.deployment.naming,
        "managing API Gateway log retention"
    );

    // Step 6: Run the hook; any failure exits non-zero
    RetentionHook::new(apigateway, logs)
        .with_mode(mode)
        .run(
            &config.deployment,
            &config.access_logging,
            &config.execution_logging,
        )
        .await?;

    Ok(())
}

fn apply_cli_overrides(config: &mut HookConfig, cli: &Cli) {
    if let Some(service) = &cli.service {
        config.deployment.service = service.clone();
    }
    if let Some(stage) = &cli.stage {
        config.deployment.stage = stage.clone();
    }
    if let Some(region) = &cli.region {
        config.deployment.region = region.clone();
    }
    if let Some(profile) = &cli.profile {
        config.provider.profile = Some(profile.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
}
