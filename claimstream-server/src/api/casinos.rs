use axum::{
    Json,
    extract::{Path, State},
};
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

use claimstream_core::analytics::{Timeframe, daily_buckets, recent_activity, weekly_position};
use claimstream_core::entities::casinos::{GetCasinoById, GetCasinoBySlug};
use claimstream_core::entities::tracking_events::{
    CountCasinoClaims, CountClaimsByCasinoSince, GetOfferEventsInWindow, GetRecentOfferEvents,
};
use claimstream_core::framework::DatabaseProcessor;
use claimstream_sdk::objects::{CasinoDetail, CasinoStats, CasinoStatsResponse};

use super::ApiError;
use crate::state::AppState;

/// How many events the per-casino recent feed returns.
const CASINO_RECENT_LIMIT: i64 = 10;

/// `GET /casinos/{id_or_slug}/analytics` — one casino's dashboard data.
///
/// The path segment is a UUID or a slug; anything that does not parse as
/// a UUID is treated as a slug. Returns headline stats (all-time claims,
/// trailing-7-day total and leaderboard position), a 7-day chart and a
/// short recent feed.
pub(super) async fn casino_analytics(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> Result<Json<CasinoStatsResponse>, ApiError> {
    let processor = DatabaseProcessor {
        pool: state.db.clone(),
    };

    let casino = match Uuid::parse_str(&id_or_slug) {
        Ok(id) => processor.process(GetCasinoById { id }).await,
        Err(_) => {
            processor
                .process(GetCasinoBySlug { slug: id_or_slug })
                .await
        }
    }
    .map_err(ApiError::Database)?
    .ok_or(ApiError::NotFound)?;

    let offset = state.config.site.read().await.utc_offset;
    let caps = state.config.analytics.read().await.alltime_caps;
    let week = Timeframe::Last7Days.resolve(OffsetDateTime::now_utc(), offset, caps);

    let total_claims = processor
        .process(CountCasinoClaims {
            casino_id: casino.id,
        })
        .await
        .map_err(ApiError::Database)?;

    let weekly_rows = processor
        .process(CountClaimsByCasinoSince { since: week.start })
        .await
        .map_err(ApiError::Database)?;
    let (position, weekly_total) = weekly_position(&weekly_rows, casino.id);

    let events = processor
        .process(GetOfferEventsInWindow {
            start: week.start,
            end: week.end,
            casino_id: Some(casino.id),
            limit: None,
        })
        .await
        .map_err(ApiError::Database)?;
    let chart_data = daily_buckets(&events, &week);

    let recent_events = processor
        .process(GetRecentOfferEvents {
            casino_id: Some(casino.id),
            limit: CASINO_RECENT_LIMIT,
        })
        .await
        .map_err(ApiError::Database)?;

    Ok(Json(CasinoStatsResponse {
        casino: CasinoDetail {
            id: casino.id,
            name: casino.name,
            slug: casino.slug,
            logo: casino.logo_url,
        },
        stats: CasinoStats {
            total_claims,
            weekly_total,
            weekly_leaderboard_position: position,
        },
        chart_data,
        recent_activity: recent_activity(&recent_events),
    }))
}
