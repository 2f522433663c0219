//! Fire-and-forget notification publishing.
//!
//! After an offer action is persisted, the ingest handler hands the
//! event to [`NotificationPublisher::publish_offer_event`], which spawns
//! a task to resolve the referenced casino/bonus display snapshot and
//! push the decorated notification into the hub. Any failure along the
//! way is logged and swallowed: publishing can never fail or delay the
//! ingest response, and ingest latency stays independent of subscriber
//! count and decoration-lookup latency.

use std::sync::Arc;

use kanau::processor::Processor;
use sqlx::PgPool;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::entities::casinos::{GetBonusById, GetCasinoById};
use crate::events::NotificationHub;
use crate::framework::DatabaseProcessor;
use claimstream_sdk::objects::LiveNotification;

/// Errors internal to the decoration task; never surfaced to ingest.
#[derive(Debug, Error)]
enum NotifyError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Referenced casino is gone; the notification is skipped.
    #[error("casino not found: {0}")]
    CasinoMissing(Uuid),

    /// Referenced bonus is gone; the notification is skipped.
    #[error("bonus not found: {0}")]
    BonusMissing(Uuid),
}

/// Decorates persisted offer events and publishes them to the hub.
#[derive(Clone)]
pub struct NotificationPublisher {
    pool: PgPool,
    hub: Arc<NotificationHub>,
}

impl NotificationPublisher {
    pub fn new(pool: PgPool, hub: Arc<NotificationHub>) -> Self {
        Self { pool, hub }
    }

    /// Kick off decoration + publish for one persisted offer event.
    ///
    /// Returns immediately; the spawned task owns the outcome.
    pub fn publish_offer_event(
        &self,
        event_id: Uuid,
        casino_id: Uuid,
        bonus_id: Uuid,
        created_at: OffsetDateTime,
    ) {
        let pool = self.pool.clone();
        let hub = Arc::clone(&self.hub);
        tokio::spawn(async move {
            match decorate(&pool, event_id, casino_id, bonus_id, created_at).await {
                Ok(notification) => hub.publish(&notification),
                Err(e @ (NotifyError::CasinoMissing(_) | NotifyError::BonusMissing(_))) => {
                    debug!(%event_id, error = %e, "skipping notification for missing entity");
                }
                Err(e) => {
                    warn!(%event_id, error = %e, "failed to decorate notification, dropping");
                }
            }
        });
    }
}

/// Resolve the entity display snapshot for one offer event.
async fn decorate(
    pool: &PgPool,
    event_id: Uuid,
    casino_id: Uuid,
    bonus_id: Uuid,
    created_at: OffsetDateTime,
) -> Result<LiveNotification, NotifyError> {
    let processor = DatabaseProcessor {
        pool: pool.clone(),
    };

    let casino = processor
        .process(GetCasinoById { id: casino_id })
        .await?
        .ok_or(NotifyError::CasinoMissing(casino_id))?;

    let bonus = processor
        .process(GetBonusById { id: bonus_id })
        .await?
        .ok_or(NotifyError::BonusMissing(bonus_id))?;

    Ok(LiveNotification {
        id: event_id,
        casino_name: casino.name,
        casino_logo: casino.logo_url.unwrap_or_default(),
        casino_slug: casino.slug,
        bonus_title: bonus.title,
        bonus_code: bonus.code,
        created_at,
    })
}
