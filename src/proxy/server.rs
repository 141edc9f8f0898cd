use crate::proxy::config::ProxyConfig;
use crate::proxy::forwarder::ProxyForwarder;
use crate::proxy::path_resolver::{PathPrefixResolver, PathResolver, QueryParamResolver};
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error};

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<ProxyForwarder>,
    pub resolver: Arc<dyn PathResolver>,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> Self {
        let resolver: Arc<dyn PathResolver> = match config.route_prefix.as_deref() {
            Some(prefix) if !prefix.trim().is_empty() => {
                tracing::info!("Routing by path prefix {}", prefix);
                Arc::new(PathPrefixResolver::new(prefix))
            }
            _ => {
                tracing::info!("Routing by query parameter '{}'", config.endpoint_param);
                Arc::new(QueryParamResolver::new(config.endpoint_param.clone()))
            }
        };

        Self {
            forwarder: Arc::new(ProxyForwarder::from_config(config)),
            resolver,
        }
    }
}

/// Build routes: `/healthz`, everything else goes to the forwarder
pub fn build_router(state: AppState) -> Router {
    use crate::proxy::handlers;

    Router::new()
        .route("/healthz", get(handlers::health::health_check_handler))
        .fallback(handlers::forward::handle_forward)
        .layer(axum::middleware::from_fn(
            crate::proxy::middleware::request_logger,
        ))
        .with_state(state)
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl AxumServer {
    /// Start Axum server
    pub async fn start(
        host: String,
        port: u16,
        state: AppState,
    ) -> Result<(Self, tokio::task::JoinHandle<()>), String> {
        let app = build_router(state);

        // Bind address
        let addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| format!("Failed to bind address {}: {}", addr, e))?;

        tracing::info!("Reverse proxy server started at http://{}", addr);

        // Create shutdown channel
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let server_instance = Self {
            shutdown_tx: Some(shutdown_tx),
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
                        tracing::info!("Reverse proxy server stopped listening");
                        break;
                    }
                }
            }
        });

        Ok((server_instance, handle))
    }

    /// Stop server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
