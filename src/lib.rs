pub mod client;
pub mod error;
pub mod models;
pub mod modules;
pub mod proxy; // Proxy service module
pub mod utils;

use error::AppResult;
use proxy::ProxyConfig;
use tracing::info;

/// Run the proxy until Ctrl-C.
pub async fn serve(host: &str, config: ProxyConfig) -> AppResult<()> {
    let port = config.port;
    let (server, handle) = proxy::AxumServer::start(host, port, config).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown requested");

    server.stop();
    if let Err(e) = handle.await {
        tracing::error!("Proxy task ended abnormally: {}", e);
    }
    Ok(())
}
