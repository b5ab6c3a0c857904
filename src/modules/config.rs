use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::models::AppConfig;

const DATA_DIR: &str = ".moviearc";
const CONFIG_FILE: &str = "config.json";

pub const DATA_DIR_ENV: &str = "MOVIEARC_DATA_DIR";
pub const API_KEY_ENV: &str = "TMDB_API_KEY";
pub const PROXY_BASE_ENV: &str = "MOVIEARC_PROXY_BASE";

/// Get data directory path, creating it if needed
pub fn get_data_dir() -> AppResult<PathBuf> {
    let data_dir = match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::home_dir()
            .ok_or_else(|| AppError::Config("Failed to get user home directory".to_string()))?
            .join(DATA_DIR),
    };

    // Ensure directory exists
    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }

    Ok(data_dir)
}

/// Load application config from the data directory, then apply environment
/// overrides
pub fn load_app_config() -> AppResult<AppConfig> {
    let mut config = load_app_config_from(&get_data_dir()?)?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

/// Load config from `dir`, falling back to defaults when the file is absent
pub fn load_app_config_from(dir: &Path) -> AppResult<AppConfig> {
    let config_path = dir.join(CONFIG_FILE);

    if !config_path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(&config_path)?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("Failed to parse config file: {}", e)))
}

/// Save application config
pub fn save_app_config(config: &AppConfig) -> AppResult<PathBuf> {
    save_app_config_to(&get_data_dir()?, config)
}

pub fn save_app_config_to(dir: &Path, config: &AppConfig) -> AppResult<PathBuf> {
    let config_path = dir.join(CONFIG_FILE);
    let content = serde_json::to_string_pretty(config)?;
    fs::write(&config_path, content)?;
    Ok(config_path)
}

/// Environment values win over the file; blank values are ignored.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_blank(API_KEY_ENV) {
        config.proxy.tmdb_api_key = Some(key);
    }
    if let Some(base) = non_blank(PROXY_BASE_ENV) {
        config.client.proxy_base = Some(base);
    }
}

/// `--proxy-base` wins over file and environment, unless blank
pub fn apply_proxy_base_flag(config: &mut AppConfig, flag: Option<String>) {
    if let Some(base) = flag.filter(|v| !v.trim().is_empty()) {
        config.client.proxy_base = Some(base);
    }
}
