use axum::{Json, extract::State};
use kanau::processor::Processor;

use claimstream_core::analytics::{choose_most_popular, unique_actor_estimate};
use claimstream_core::entities::ActionType;
use claimstream_core::entities::casinos::{CountActiveBonuses, GetBonusById, GetCasinoById};
use claimstream_core::entities::tracking_events::{
    CountDistinctOfferPaths, CountDistinctVisitorPaths, CountEventsOfType, GetMostClaimedBonus,
    SumClaimedValue,
};
use claimstream_core::framework::DatabaseProcessor;
use claimstream_sdk::objects::{MostClaimedOffer, StatisticsResponse};

use crate::state::AppState;

/// `GET /statistics` — global site statistics.
///
/// This endpoint never returns a 500: on any internal failure it
/// responds with the same shape zeroed plus an `error` field, so
/// dashboards keep rendering.
pub(super) async fn get_statistics(State(state): State<AppState>) -> Json<StatisticsResponse> {
    match compute(&state).await {
        Ok(response) => Json(response),
        Err(e) => {
            tracing::error!(error = %e, "statistics aggregation failed");
            Json(StatisticsResponse::zeroed(
                "statistics temporarily unavailable",
            ))
        }
    }
}

async fn compute(state: &AppState) -> Result<StatisticsResponse, sqlx::Error> {
    let processor = DatabaseProcessor {
        pool: state.db.clone(),
    };

    let visitor_paths = processor.process(CountDistinctVisitorPaths).await?;
    let offer_paths = processor.process(CountDistinctOfferPaths).await?;
    let actors = unique_actor_estimate(visitor_paths, offer_paths);
    if actors.degraded {
        tracing::debug!("no page visits recorded, estimating users from offer paths");
    }

    let total_bonuses_claimed = processor
        .process(CountEventsOfType {
            action_type: ActionType::CodeCopy,
        })
        .await?;

    let total_offers_available = processor.process(CountActiveBonuses).await?;

    let by_copies = processor
        .process(GetMostClaimedBonus {
            action_type: ActionType::CodeCopy,
        })
        .await?;
    let by_clicks = processor
        .process(GetMostClaimedBonus {
            action_type: ActionType::OfferClick,
        })
        .await?;

    let most_claimed_offer = match choose_most_popular(by_copies, by_clicks) {
        Some(top) => Some(decorate_offer(&processor, top.bonus_id, top.claims).await?),
        None => None,
    };

    let total_claimed_value = processor.process(SumClaimedValue).await?;

    Ok(StatisticsResponse {
        total_users: actors.count,
        total_bonuses_claimed,
        total_offers_available,
        most_claimed_offer,
        total_claimed_value,
        error: None,
    })
}

/// Attach display metadata to the top bonus. A bonus or casino deleted
/// since its events still reports the count, just undecorated.
async fn decorate_offer(
    processor: &DatabaseProcessor,
    bonus_id: uuid::Uuid,
    claims: i64,
) -> Result<MostClaimedOffer, sqlx::Error> {
    let Some(bonus) = processor.process(GetBonusById { id: bonus_id }).await? else {
        return Ok(MostClaimedOffer {
            bonus_id,
            title: None,
            casino_name: None,
            claims,
        });
    };

    let casino = processor
        .process(GetCasinoById {
            id: bonus.casino_id,
        })
        .await?;

    Ok(MostClaimedOffer {
        bonus_id,
        title: Some(bonus.title),
        casino_name: casino.map(|c| c.name),
        claims,
    })
}
