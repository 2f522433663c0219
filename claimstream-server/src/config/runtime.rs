//! Runtime configuration types.
//!
//! These are the validated, already-converted forms the handlers read
//! (a real `UtcOffset` instead of raw hours, a `Duration` instead of
//! seconds). Each section lives behind its own lock so a SIGHUP reload
//! swaps sections independently without blocking unrelated readers.

use std::sync::Arc;
use std::time::Duration;

use claimstream_core::analytics::AlltimeCaps;
use std::net::SocketAddr;
use time::UtcOffset;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

#[derive(Debug, Clone, Copy)]
pub struct SiteConfig {
    /// Fixed offset of the site-local calendar.
    pub utc_offset: UtcOffset,
}

#[derive(Debug, Clone, Copy)]
pub struct StreamConfig {
    /// Interval between keepalive frames on idle streams.
    pub heartbeat: Duration,
}

#[derive(Debug, Clone, Copy)]
pub struct AnalyticsConfig {
    pub alltime_caps: AlltimeCaps,
    pub recent_limit: i64,
}

/// All runtime config sections, individually lockable.
#[derive(Clone)]
pub struct SharedConfig {
    pub server: Arc<RwLock<ServerConfig>>,
    pub site: Arc<RwLock<SiteConfig>>,
    pub stream: Arc<RwLock<StreamConfig>>,
    pub analytics: Arc<RwLock<AnalyticsConfig>>,
}
