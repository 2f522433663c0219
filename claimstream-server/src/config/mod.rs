//! Configuration module for claimstream-server.
//!
//! Handles loading configuration from a TOML file, CLI arguments and
//! environment variables, and converting the raw file values into the
//! runtime types handlers consume.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{
    AnalyticsConfig, ServerConfig, SharedConfig, SiteConfig, StreamConfig,
};
use claimstream_core::analytics::AlltimeCaps;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use time::UtcOffset;
use tokio::sync::RwLock;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Loaded configuration result containing all sections.
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub stream: StreamConfig,
    pub analytics: AnalyticsConfig,
}

impl LoadedConfig {
    /// Convert into a SharedConfig with Arc<RwLock<T>> wrappers.
    pub fn into_shared(self) -> SharedConfig {
        SharedConfig {
            server: Arc::new(RwLock::new(self.server)),
            site: Arc::new(RwLock::new(self.site)),
            stream: Arc::new(RwLock::new(self.stream)),
            analytics: Arc::new(RwLock::new(self.analytics)),
        }
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file (a missing file means all defaults)
    /// 2. Apply CLI overrides
    /// 3. Validate and convert into runtime types
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str::<FileConfig>(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = ?self.config_path, "config file not found, using defaults");
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        build_loaded_config(file_config)
    }

    /// Reload the configuration (used during SIGHUP).
    ///
    /// Returns a LoadedConfig that can be used to update individual
    /// sections of a SharedConfig.
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }
}

fn build_loaded_config(file_config: FileConfig) -> Result<LoadedConfig, ConfigError> {
    let utc_offset = UtcOffset::from_hms(file_config.site.utc_offset_hours, 0, 0).map_err(|_| {
        ConfigError::ValidationError(format!(
            "site.utc_offset_hours out of range: {}",
            file_config.site.utc_offset_hours
        ))
    })?;

    if file_config.stream.heartbeat_secs == 0 {
        return Err(ConfigError::ValidationError(
            "stream.heartbeat_secs must be at least 1".into(),
        ));
    }

    let analytics = &file_config.analytics;
    if analytics.alltime_lookback_days < 1
        || analytics.alltime_max_rows < 1
        || analytics.recent_limit < 1
    {
        return Err(ConfigError::ValidationError(
            "analytics limits must be at least 1".into(),
        ));
    }

    Ok(LoadedConfig {
        server: ServerConfig {
            listen: file_config.server.listen,
        },
        site: SiteConfig { utc_offset },
        stream: StreamConfig {
            heartbeat: Duration::from_secs(file_config.stream.heartbeat_secs),
        },
        analytics: AnalyticsConfig {
            alltime_caps: AlltimeCaps {
                lookback_days: analytics.alltime_lookback_days,
                max_rows: analytics.alltime_max_rows,
            },
            recent_limit: analytics.recent_limit,
        },
    })
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_offset() {
        let mut config = FileConfig::default();
        config.site.utc_offset_hours = 30;
        assert!(matches!(
            build_loaded_config(config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn rejects_zero_heartbeat() {
        let mut config = FileConfig::default();
        config.stream.heartbeat_secs = 0;
        assert!(matches!(
            build_loaded_config(config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn converts_offset_and_caps() {
        let mut config = FileConfig::default();
        config.site.utc_offset_hours = -5;
        config.analytics.alltime_max_rows = 100;

        let loaded = build_loaded_config(config).unwrap();
        assert_eq!(loaded.site.utc_offset, UtcOffset::from_hms(-5, 0, 0).unwrap());
        assert_eq!(loaded.analytics.alltime_caps.max_rows, 100);
        assert_eq!(loaded.stream.heartbeat, Duration::from_secs(25));
    }
}
