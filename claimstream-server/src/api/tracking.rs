use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use kanau::processor::Processor;
use serde::Deserialize;
use std::sync::Arc;
use time::{OffsetDateTime, PrimitiveDateTime};
use uuid::Uuid;

use claimstream_core::analytics::local_day_start_utc;
use claimstream_core::entities::tracking_events::{
    CountBonusUsageSince, CountPairUsageSince, GetBonusLastUsed,
};
use claimstream_core::framework::DatabaseProcessor;
use claimstream_core::ingest::{IngestError, ValidatedTracking};
use claimstream_core::processors::NotificationPublisher;
use claimstream_sdk::objects::{TrackRequest, TrackResponse, TrackedEvent, UsageResponse};

use super::ApiError;
use crate::state::AppState;

/// `POST /tracking` — record one user action.
///
/// Validation runs before any write; the same-day usage count and the
/// live notification happen only for offer actions. The notification is
/// fire-and-forget, so the response never waits on subscriber delivery.
pub(super) async fn track(
    State(state): State<AppState>,
    Json(body): Json<TrackRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let validated = ValidatedTracking::from_request(&body)
        .map_err(|IngestError::Validation(message)| ApiError::Validation(message))?;

    let processor = DatabaseProcessor {
        pool: state.db.clone(),
    };

    let id = Uuid::new_v4();
    let now = OffsetDateTime::now_utc();
    let created_at = PrimitiveDateTime::new(now.date(), now.time());

    let action_type = validated.action_type;
    let entity_ref = validated.casino_id.zip(validated.bonus_id);

    processor
        .process(validated.into_insert(id, created_at))
        .await
        .map_err(ApiError::Database)?;

    // Offer actions carry a complete entity ref by the ingest contract.
    let mut usage_count = None;
    if let Some((casino_id, bonus_id)) = entity_ref
        && action_type.is_offer_action()
    {
        let offset = state.config.site.read().await.utc_offset;
        let count = processor
            .process(CountPairUsageSince {
                casino_id,
                bonus_id,
                since: local_day_start_utc(now, offset),
            })
            .await
            .map_err(ApiError::Database)?;
        usage_count = Some(count);

        NotificationPublisher::new(state.db.clone(), Arc::clone(&state.hub))
            .publish_offer_event(id, casino_id, bonus_id, now);
    }

    Ok(Json(TrackResponse {
        success: true,
        tracking: TrackedEvent {
            id,
            action_type: action_type.into(),
            created_at: now,
        },
        usage_count,
    }))
}

/// `GET /tracking?bonusId=…` query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UsageQuery {
    bonus_id: Option<Uuid>,
}

/// `GET /tracking?bonusId=…` — same-day usage count for a bonus.
pub(super) async fn usage(
    State(state): State<AppState>,
    Query(query): Query<UsageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let bonus_id = query
        .bonus_id
        .ok_or_else(|| ApiError::Validation("bonusId is required".into()))?;

    let processor = DatabaseProcessor {
        pool: state.db.clone(),
    };

    let offset = state.config.site.read().await.utc_offset;
    let since = local_day_start_utc(OffsetDateTime::now_utc(), offset);

    let usage_count = processor
        .process(CountBonusUsageSince { bonus_id, since })
        .await
        .map_err(ApiError::Database)?;

    let last_used = processor
        .process(GetBonusLastUsed { bonus_id })
        .await
        .map_err(ApiError::Database)?
        .map(|at| at.assume_utc());

    Ok(Json(UsageResponse {
        usage_count,
        last_used,
    }))
}
