//! Service configuration parsed from environment variables.

use crate::grid::{self, GridConfig, GridConfigError};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_CATALOG_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_CATALOG_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CATALOG_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid grid configuration: {0}")]
    Grid(#[from] GridConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub port: u16,
    pub catalog: CatalogConfig,
    pub grid: GridConfig,
    pub start_muted: bool,
}

impl BoardConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `CATALOG_BASE_URL`: default `http://localhost:5000`
    /// - `CATALOG_REQUEST_TIMEOUT_SECS`: default 30
    /// - `CATALOG_CONNECT_TIMEOUT_SECS`: default 10
    /// - `GRID_TOTAL_COLUMNS`: default 12
    /// - `GRID_COLUMN_COUNT`: default 8
    /// - `GRID_ROW_SPAN`: default 4
    /// - `BOARD_START_MUTED`: default true
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Grid` if the grid dimensions are inconsistent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("CATALOG_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_CATALOG_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let catalog = CatalogConfig {
            base_url,
            request_timeout_secs: env_parse("CATALOG_REQUEST_TIMEOUT_SECS", DEFAULT_CATALOG_REQUEST_TIMEOUT_SECS),
            connect_timeout_secs: env_parse("CATALOG_CONNECT_TIMEOUT_SECS", DEFAULT_CATALOG_CONNECT_TIMEOUT_SECS),
        };

        let grid = GridConfig::new(
            env_parse("GRID_TOTAL_COLUMNS", grid::DEFAULT_TOTAL_COLUMNS),
            env_parse("GRID_COLUMN_COUNT", grid::DEFAULT_COLUMN_COUNT),
            env_parse("GRID_ROW_SPAN", grid::DEFAULT_ROW_SPAN),
        )?;

        Ok(Self {
            port: env_parse("PORT", DEFAULT_PORT),
            catalog,
            grid,
            start_muted: env_parse("BOARD_START_MUTED", true),
        })
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
