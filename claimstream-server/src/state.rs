//! Application state shared across all request handlers.

use claimstream_core::events::NotificationHub;
use sqlx::PgPool;
use std::sync::Arc;

use crate::config::runtime::SharedConfig;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// In-process notification hub feeding the live streams.
    pub hub: Arc<NotificationHub>,
    /// Runtime configuration (can be reloaded via SIGHUP).
    pub config: SharedConfig,
}

impl AppState {
    /// Create a new AppState with the given pool, hub and configuration.
    pub fn new(db: PgPool, hub: Arc<NotificationHub>, config: SharedConfig) -> Self {
        Self { db, hub, config }
    }
}
