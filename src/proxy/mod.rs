// proxy module - TMDB key-hiding proxy service

pub mod config;
pub mod error;
pub mod route;
pub mod server;

pub mod handlers; // API endpoint handlers
pub mod middleware; // Axum middleware
pub mod upstream; // Upstream client

#[cfg(test)]
pub(crate) mod test_support;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use route::{MovieQuery, QueryParams, UpstreamTarget};
pub use server::AxumServer;
