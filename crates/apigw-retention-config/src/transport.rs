// Outbound transport and credential settings shared by every AWS client.
//
// Resolved once per invocation from the process environment and the
// provider section of the hook config.

use crate::{EnvSource, ProviderConfig};

/// Proxy variables in lookup order; the first non-empty value wins.
pub const PROXY_ENV_VARS: &[&str] = &[
    "proxy",
    "HTTP_PROXY",
    "http_proxy",
    "HTTPS_PROXY",
    "https_proxy",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportConfig {
    pub proxy_url: Option<String>,
    pub credential_profile: Option<String>,
}

impl TransportConfig {
    pub fn resolve<E: EnvSource>(env: &E, provider: &ProviderConfig) -> Self {
        let proxy_url = PROXY_ENV_VARS
            .iter()
            .filter_map(|key| env.get_raw(key))
            .find(|value| !value.is_empty());

        let credential_profile = provider
            .profile
            .as_ref()
            .filter(|profile| !profile.is_empty())
            .cloned();

        Self {
            proxy_url,
            credential_profile,
        }
    }
}
