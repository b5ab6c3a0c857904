use crate::error::{AppError, AppResult};
use crate::proxy::config::ProxyConfig;
use crate::proxy::middleware::CorsPolicy;
use crate::proxy::upstream::UpstreamClient;
use axum::{
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    pub fn new(config: ProxyConfig) -> AppResult<Self> {
        let upstream = UpstreamClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
        })
    }
}

/// Build routes
pub fn build_router(state: AppState, cors: CorsPolicy) -> Router {
    use crate::proxy::handlers;

    Router::new()
        .route("/", get(handlers::movies::handle_movies))
        .route("/healthz", get(health_check_handler))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            Arc::new(cors),
            crate::proxy::middleware::cors_middleware,
        ))
        .with_state(state)
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
    local_addr: SocketAddr,
}

impl AxumServer {
    /// Start Axum server
    pub async fn start(
        host: &str,
        port: u16,
        config: ProxyConfig,
    ) -> AppResult<(Self, tokio::task::JoinHandle<()>)> {
        if config.api_key().is_none() {
            tracing::warn!("No TMDB API key configured; movie requests will answer 500");
        }

        let state = AppState::new(config)?;
        let app = build_router(state, CorsPolicy::default());

        // Bind address
        let addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Server(format!("Failed to bind address {}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Movie proxy started at http://{}", local_addr);

        // Create shutdown channel
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let server_instance = Self {
            shutdown_tx: Some(shutdown_tx),
            local_addr,
        };

        // Start server in new task
        let handle = tokio::spawn(async move {
            use hyper::server::conn::http1;
            use hyper_util::rt::TokioIo;
            use hyper_util::service::TowerToHyperService;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let service = TowerToHyperService::new(app.clone());

                                tokio::task::spawn(async move {
                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("Connection handling finished or errored: {:?}", err);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {:?}", e);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Movie proxy stopped listening");
                        break;
                    }
                }
            }
        });

        Ok((server_instance, handle))
    }

    /// Address actually bound, useful when started on port 0
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Health check handler
async fn health_check_handler() -> Response {
    Json(serde_json::json!({
        "status": "ok"
    }))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_and_stop() {
        let (server, handle) = AxumServer::start("127.0.0.1", 0, ProxyConfig::default())
            .await
            .unwrap();
        let addr = server.local_addr();
        assert_ne!(addr.port(), 0);

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let body: serde_json::Value = client
            .get(format!("http://{}/healthz", addr))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");

        server.stop();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_start_rejects_bad_upstream() {
        let config = ProxyConfig {
            upstream_base_url: "::nope".to_string(),
            ..ProxyConfig::default()
        };
        assert!(AxumServer::start("127.0.0.1", 0, config).await.is_err());
    }
}
