use serde::{Deserialize, Serialize};

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Proxy service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Whether to allow LAN access
    /// - false: only 127.0.0.1 (default)
    /// - true: bind 0.0.0.0
    #[serde(default)]
    pub allow_lan_access: bool,

    /// Listening port
    #[serde(default = "default_port")]
    pub port: u16,

    /// TMDB API key, attached to every upstream request.
    /// `TMDB_API_KEY` in the environment takes precedence.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// Upstream metadata API root, without trailing slash
    #[serde(default = "default_upstream_base_url")]
    pub upstream_base_url: String,

    /// Upstream request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Outbound proxy configuration
    #[serde(default)]
    pub upstream_proxy: UpstreamProxyConfig,
}

/// Outbound proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpstreamProxyConfig {
    /// Whether enabled
    pub enabled: bool,
    /// Proxy address (http://, https://, socks5://)
    pub url: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            allow_lan_access: false,
            port: default_port(),
            tmdb_api_key: None,
            upstream_base_url: default_upstream_base_url(),
            request_timeout: default_request_timeout(),
            upstream_proxy: UpstreamProxyConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    8787
}

fn default_upstream_base_url() -> String {
    DEFAULT_UPSTREAM_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl ProxyConfig {
    /// Get the actual listening address
    pub fn get_bind_address(&self) -> &str {
        if self.allow_lan_access {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        }
    }

    /// The configured key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.tmdb_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}
