//! TOML file configuration structures.
//!
//! These structs directly map to the `claimstream.toml` file format.
//! Every section and field has a default, so an empty file is a valid
//! configuration.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

/// Site-wide calendar settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Fixed UTC offset of the site-local calendar, in whole hours.
    /// All daily analytics buckets are computed in this calendar.
    #[serde(default)]
    pub utc_offset_hours: i8,
}

/// Live notification stream settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Seconds between keepalive heartbeat frames on idle streams.
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_secs: u64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            heartbeat_secs: default_heartbeat_secs(),
        }
    }
}

fn default_heartbeat_secs() -> u64 {
    25
}

/// Analytics engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// How far back an `alltime` query reaches, in days.
    #[serde(default = "default_alltime_lookback_days")]
    pub alltime_lookback_days: i64,
    /// Row cap applied to `alltime` event pulls.
    #[serde(default = "default_alltime_max_rows")]
    pub alltime_max_rows: i64,
    /// How many events the recent-activity feed returns.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            alltime_lookback_days: default_alltime_lookback_days(),
            alltime_max_rows: default_alltime_max_rows(),
            recent_limit: default_recent_limit(),
        }
    }
}

fn default_alltime_lookback_days() -> i64 {
    claimstream_core::analytics::timeframe::DEFAULT_ALLTIME_LOOKBACK_DAYS
}

fn default_alltime_max_rows() -> i64 {
    claimstream_core::analytics::timeframe::DEFAULT_ALLTIME_MAX_ROWS
}

fn default_recent_limit() -> i64 {
    20
}
