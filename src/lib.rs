pub mod error;
pub mod models;
pub mod modules;
pub mod proxy; // Proxy service module
pub mod utils;

use std::path::PathBuf;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::AppConfig;

/// Startup options supplied by the binary.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

/// Resolve configuration: CLI > env > file > defaults.
pub fn load_config(options: &RunOptions) -> AppResult<(AppConfig, PathBuf)> {
    let data_dir = match &options.data_dir {
        Some(dir) => {
            modules::config::ensure_dir(dir)?;
            dir.clone()
        }
        None => modules::config::get_data_dir()?,
    };

    let config_path = options
        .config_path
        .clone()
        .unwrap_or_else(|| modules::config::default_config_path(&data_dir));

    let mut config = modules::config::load_app_config(&config_path)?;
    modules::config::apply_env_overrides(&mut config.proxy, |k| std::env::var(k).ok());
    if let Some(port) = options.port {
        config.proxy.port = port;
    }

    Ok((config, data_dir))
}

/// Run the proxy until Ctrl-C.
pub async fn run(options: RunOptions) -> AppResult<()> {
    let (config, data_dir) = load_config(&options)?;

    let log_dir = config
        .log_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| data_dir.join("logs"));
    modules::logger::init_logger(&log_dir)?;

    let proxy_config = config.proxy;
    if proxy_config.client_id.is_empty() || proxy_config.client_secret.is_empty() {
        tracing::warn!(
            "Client credentials are not configured; proxied calls will fail until {} and {} are set",
            modules::config::ENV_CLIENT_ID,
            modules::config::ENV_CLIENT_SECRET
        );
    }

    let state = proxy::AppState::from_config(&proxy_config);
    let (server, handle) = proxy::AxumServer::start(
        proxy_config.get_bind_address().to_string(),
        proxy_config.port,
        state,
    )
    .await
    .map_err(AppError::Server)?;

    info!("Forwarding to {}", proxy_config.api_base_url());

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    server.stop();
    handle
        .await
        .map_err(|e| AppError::Server(format!("Server task failed: {}", e)))?;

    Ok(())
}
