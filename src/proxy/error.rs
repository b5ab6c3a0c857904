// Proxy error responses
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failures surfaced to proxy callers. The bodies are fixed strings so no
/// upstream detail (or credential) leaks through.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Server key missing")]
    MissingApiKey,

    /// Upstream answered with a non-2xx status, relayed as-is
    #[error("TMDB error")]
    Upstream(StatusCode),

    /// Upstream could not be reached or its body could not be read
    #[error("TMDB error")]
    Transport(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Upstream(status) => *status,
            ProxyError::Transport(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
