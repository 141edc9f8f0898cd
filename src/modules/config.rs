use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::models::AppConfig;
use crate::proxy::ProxyConfig;

const DATA_DIR: &str = ".bearer_proxy";
const CONFIG_FILE: &str = "proxy_config.json";

pub const ENV_CLIENT_ID: &str = "BEARER_PROXY_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "BEARER_PROXY_CLIENT_SECRET";
pub const ENV_API_HOST: &str = "BEARER_PROXY_API_HOST";

/// Older deployments set these; consulted only when the names above are unset.
pub const LEGACY_ENV_CLIENT_ID: &str = "PROKERALA_CLIENT_ID";
pub const LEGACY_ENV_CLIENT_SECRET: &str = "PROKERALA_CLIENT_SECRET";

/// Get data directory path, creating it if needed
pub fn get_data_dir() -> AppResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| AppError::Config("Failed to get user home directory".to_string()))?;
    let data_dir = home.join(DATA_DIR);
    ensure_dir(&data_dir)?;
    Ok(data_dir)
}

pub fn ensure_dir(dir: &Path) -> AppResult<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

pub fn default_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Load application config. A missing file is written out with defaults.
pub fn load_app_config(config_path: &Path) -> AppResult<AppConfig> {
    if !config_path.exists() {
        let config = AppConfig::new();
        save_app_config(config_path, &config)?;
        tracing::info!("Created default config at {:?}", config_path);
        return Ok(config);
    }

    let content = fs::read_to_string(config_path)?;
    serde_json::from_str(&content).map_err(|e| {
        AppError::Config(format!(
            "Failed to parse config file {:?}: {}",
            config_path, e
        ))
    })
}

/// Save application config
pub fn save_app_config(config_path: &Path, config: &AppConfig) -> AppResult<()> {
    if let Some(parent) = config_path.parent() {
        ensure_dir(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    fs::write(config_path, content)?;
    Ok(())
}

/// Overlay credentials and API host from the environment. Empty values are
/// ignored. Credentials fall back to the legacy `PROKERALA_*` names.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(id) = read(ENV_CLIENT_ID).or_else(|| read(LEGACY_ENV_CLIENT_ID)) {
        config.client_id = id;
    }
    if let Some(secret) = read(ENV_CLIENT_SECRET).or_else(|| read(LEGACY_ENV_CLIENT_SECRET)) {
        config.client_secret = secret;
    }
    if let Some(host) = read(ENV_API_HOST) {
        config.api_host = host;
    }
}
