use thiserror::Error;

/// Client failures. `Display` is the message shown to the user; the
/// underlying cause is kept for logs.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Proxy URL missing. Set MOVIEARC_PROXY_BASE to your proxy URL.")]
    MissingProxyBase,

    #[error("Invalid proxy URL: {0}")]
    InvalidProxyBase(String),

    #[error("Missing movie id.")]
    MissingMovieId,

    #[error("{message}")]
    Fetch {
        message: &'static str,
        cause: String,
    },
}

impl ClientError {
    pub(crate) fn fetch(message: &'static str, cause: impl ToString) -> Self {
        ClientError::Fetch {
            message,
            cause: cause.to_string(),
        }
    }
}
