// Upstream client implementation
// One GET per proxied request against the TMDB v3 API

use bytes::Bytes;
use reqwest::{header, Client};
use url::Url;

use crate::error::{AppError, AppResult};
use crate::proxy::config::ProxyConfig;
use crate::proxy::error::ProxyError;
use crate::proxy::route::UpstreamTarget;

pub struct UpstreamClient {
    http_client: Client,
    base_url: Url,
}

impl UpstreamClient {
    pub fn new(config: &ProxyConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.upstream_base_url).map_err(|e| {
            AppError::Config(format!(
                "Invalid upstream base URL {}: {}",
                config.upstream_base_url, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "Upstream base URL cannot carry a path: {}",
                config.upstream_base_url
            )));
        }

        let http_client = crate::utils::http::create_client_with_proxy(
            config.request_timeout,
            Some(&config.upstream_proxy),
        );

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Build the upstream URL. `api_key` goes first, then the target's
    /// own pairs, each form-encoded exactly once.
    fn build_url(&self, target: &UpstreamTarget, api_key: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(&target.segments);
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", api_key);
            for (key, value) in &target.params {
                pairs.append_pair(key, value);
            }
        }
        url
    }

    /// Fetch `target` and return the raw body on 2xx.
    pub async fn fetch(&self, target: &UpstreamTarget, api_key: &str) -> Result<Bytes, ProxyError> {
        let url = self.build_url(target, api_key);

        let response = self
            .http_client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            // The request URL carries the key; keep it out of the error text
            .map_err(|e| ProxyError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProxyError::Upstream(status));
        }

        response
            .bytes()
            .await
            .map_err(|e| ProxyError::Transport(e.without_url().to_string()))
    }
}
