// Initialization utilities
//
// AWS client and logging/tracing setup

use std::sync::Arc;

use anyhow::{anyhow, Result};
use apigw_retention_config::{LogConfig, LogFormat, TransportConfig};
use aws_config::{BehaviorVersion, ConfigLoader, Region, SdkConfig};
use aws_smithy_http_client::{proxy::ProxyConfig, tls, Builder, Connector};
use tracing::{debug, info};

use crate::backend::{ApiGatewayBackend, LogsBackend};

/// Build the single SDK config every client in the run shares.
pub async fn load_sdk_config(region: &str, transport: &TransportConfig) -> Result<SdkConfig> {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));

    if let Some(profile) = &transport.credential_profile {
        info!("Using AWS profile: {}", profile);
        loader = loader.profile_name(profile);
    }

    if let Some(proxy) = &transport.proxy_url {
        info!("Routing AWS requests through proxy: {}", proxy);
        loader = with_proxy(loader, proxy)?;
    }

    Ok(loader.load().await)
}

/// Route every request through `proxy` over an HTTPS client shared by all
/// clients built from the loader.
fn with_proxy(loader: ConfigLoader, proxy: &str) -> Result<ConfigLoader> {
    let proxy_config =
        ProxyConfig::all(proxy).map_err(|e| anyhow!("Invalid proxy URL '{}': {}", proxy, e))?;

    let http_client = Builder::new().build_with_connector_fn(move |settings, components| {
        let mut builder = Connector::builder().proxy_config(proxy_config.clone());
        builder.set_connector_settings(settings.cloned());
        if let Some(components) = components {
            builder.set_sleep_impl(components.sleep_impl());
        }
        builder
            .tls_provider(tls::Provider::Rustls(
                tls::rustls_provider::CryptoMode::AwsLc,
            ))
            .build()
    });

    Ok(loader.http_client(http_client))
}

/// API Gateway and CloudWatch Logs clients built from one SDK config.
pub fn init_backends(
    sdk_config: &SdkConfig,
) -> (Arc<dyn ApiGatewayBackend>, Arc<dyn LogsBackend>) {
    (
        Arc::new(aws_sdk_apigateway::Client::new(sdk_config)),
        Arc::new(aws_sdk_cloudwatchlogs::Client::new(sdk_config)),
    )
}

/// Install the global subscriber. `RUST_LOG` directives are not consulted;
/// `log.level` is the single source of the filter.
pub fn init_tracing(config: &LogConfig) {
    use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(&config.level);

    let (json, text) = match config.format {
        LogFormat::Json => (Some(fmt::layer().json().with_target(false)), None),
        LogFormat::Text => (None, Some(fmt::layer().with_target(false))),
    };

    if tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .try_init()
        .is_err()
    {
        debug!("tracing subscriber already installed");
    }
}
