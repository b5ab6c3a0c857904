use crate::proxy::ProxyConfig;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub client: ClientConfig,
}

/// Browsing client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Deployed proxy URL, e.g. `https://moviearc.example.workers.dev`
    #[serde(default)]
    pub proxy_base: Option<String>,
    /// Request timeout against the proxy (seconds)
    #[serde(default = "default_client_timeout")]
    pub request_timeout: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_base: None,
            request_timeout: default_client_timeout(),
        }
    }
}

fn default_client_timeout() -> u64 {
    15
}
