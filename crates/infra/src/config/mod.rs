//! Configuration loader
//!
//! Loads application configuration from environment variables or a TOML
//! file.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes a couple of conventional paths for the file
//!
//! ## Environment Variables
//! - `TEMPO_DB_PATH`: Database file path
//! - `TEMPO_DB_POOL_SIZE`: Connection pool size
//! - `TEMPO_LEADERBOARD_PAGE_SIZE`: Users per leaderboard page (optional)

use std::path::{Path, PathBuf};

use tempo_domain::{Config, DatabaseConfig, LeaderboardConfig, Result, TempoError};

const CONFIG_PROBE_PATHS: &[&str] = &["tempo.toml", "config.toml"];

/// Load configuration with automatic fallback strategy.
///
/// Environment variables win; when the required ones are missing, the
/// conventional file locations are probed.
///
/// # Errors
/// Returns `TempoError::Config` if neither source yields a full
/// configuration or the file fails to parse.
pub fn load() -> Result<Config> {
    dotenvy::dotenv().ok();

    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "environment incomplete, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables.
///
/// # Errors
/// Returns `TempoError::Config` if a required variable is missing or has
/// an invalid value.
pub fn load_from_env() -> Result<Config> {
    let db_path = env_var("TEMPO_DB_PATH")?;
    let db_pool_size = env_var("TEMPO_DB_POOL_SIZE").and_then(|s| {
        s.parse::<u32>().map_err(|e| TempoError::Config(format!("invalid pool size: {e}")))
    })?;

    let page_size = match std::env::var("TEMPO_LEADERBOARD_PAGE_SIZE") {
        Ok(raw) => raw
            .parse::<usize>()
            .map_err(|e| TempoError::Config(format!("invalid page size: {e}")))?,
        Err(_) => LeaderboardConfig::default().page_size,
    };

    Ok(Config {
        database: DatabaseConfig { path: db_path, pool_size: db_pool_size },
        leaderboard: LeaderboardConfig { page_size },
    })
}

/// Load configuration from a TOML file.
///
/// If `path` is `None`, probes `tempo.toml` then `config.toml` in the
/// working directory.
pub fn load_from_file(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => probe_config_path()
            .ok_or_else(|| TempoError::Config("no config file found".to_string()))?,
    };

    let raw = std::fs::read_to_string(&path).map_err(|e| {
        TempoError::Config(format!("failed to read {}: {e}", path.display()))
    })?;

    let config = toml::from_str(&raw).map_err(|e| {
        TempoError::Config(format!("failed to parse {}: {e}", path.display()))
    })?;

    tracing::info!(path = %path.display(), "configuration loaded from file");
    Ok(config)
}

fn probe_config_path() -> Option<PathBuf> {
    CONFIG_PROBE_PATHS.iter().map(PathBuf::from).find(|p| p.is_file())
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| TempoError::Config(format!("missing environment variable {name}")))
}
