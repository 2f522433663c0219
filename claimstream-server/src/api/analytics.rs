use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

use claimstream_core::analytics::{Timeframe, bonus_breakdown, casino_breakdown, daily_buckets, recent_activity, totals};
use claimstream_core::entities::casinos::{GetBonusesByCasino, GetCasinoById, GetCasinosByIds};
use claimstream_core::entities::tracking_events::{GetOfferEventsInWindow, GetRecentOfferEvents};
use claimstream_core::framework::DatabaseProcessor;
use claimstream_sdk::objects::{AnalyticsQuery, AnalyticsResponse, CasinoDetail};

use super::ApiError;
use crate::state::AppState;

/// `GET /analytics` — multi-timeframe rollup, optionally casino-scoped.
///
/// The timeframe resolves to one UTC window up front; everything after
/// is a pure fold over the fetched events. The overall view returns
/// sitewide totals plus a per-casino breakdown; passing `casinoId`
/// switches to that casino's detail plus a per-bonus breakdown.
pub(super) async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let timeframe = Timeframe::parse(query.timeframe.as_deref(), query.start_date, query.end_date)
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let offset = state.config.site.read().await.utc_offset;
    let analytics_config = *state.config.analytics.read().await;
    let window = timeframe.resolve(
        OffsetDateTime::now_utc(),
        offset,
        analytics_config.alltime_caps,
    );

    let processor = DatabaseProcessor {
        pool: state.db.clone(),
    };

    let events = processor
        .process(GetOfferEventsInWindow {
            start: window.start,
            end: window.end,
            casino_id: query.casino_id,
            limit: window.row_cap,
        })
        .await
        .map_err(ApiError::Database)?;

    let daily_activity = daily_buckets(&events, &window);

    let recent_events = processor
        .process(GetRecentOfferEvents {
            casino_id: query.casino_id,
            limit: analytics_config.recent_limit,
        })
        .await
        .map_err(ApiError::Database)?;
    let recent = recent_activity(&recent_events);

    let response = match query.casino_id {
        Some(casino_id) => {
            let casino = processor
                .process(GetCasinoById { id: casino_id })
                .await
                .map_err(ApiError::Database)?
                .ok_or(ApiError::NotFound)?;

            let mut bonus_rows = bonus_breakdown(&events);
            let bonuses = processor
                .process(GetBonusesByCasino { casino_id })
                .await
                .map_err(ApiError::Database)?;
            let by_id: HashMap<Uuid, _> = bonuses.iter().map(|b| (b.id, b)).collect();
            for row in &mut bonus_rows {
                // A bonus deleted after its events stay counted but
                // undecorated.
                if let Some(bonus) = by_id.get(&row.bonus_id) {
                    row.title = Some(bonus.title.clone());
                    row.code = bonus.code.clone();
                }
            }

            AnalyticsResponse {
                overall: None,
                casino_details: Some(CasinoDetail {
                    id: casino.id,
                    name: casino.name,
                    slug: casino.slug,
                    logo: casino.logo_url,
                }),
                casino_analytics: None,
                bonus_details: Some(bonus_rows),
                daily_activity,
                recent_activity: recent,
            }
        }
        None => {
            let mut casino_rows = casino_breakdown(&events);
            let ids: Vec<Uuid> = casino_rows.iter().map(|row| row.casino_id).collect();
            let casinos = processor
                .process(GetCasinosByIds { ids })
                .await
                .map_err(ApiError::Database)?;
            let by_id: HashMap<Uuid, _> = casinos.iter().map(|c| (c.id, c)).collect();
            for row in &mut casino_rows {
                if let Some(casino) = by_id.get(&row.casino_id) {
                    row.name = Some(casino.name.clone());
                    row.slug = Some(casino.slug.clone());
                }
            }

            AnalyticsResponse {
                overall: Some(totals(&daily_activity)),
                casino_details: None,
                casino_analytics: Some(casino_rows),
                bonus_details: None,
                daily_activity,
                recent_activity: recent,
            }
        }
    };

    Ok(Json(response))
}
