//! The append-only tracking event store.
//!
//! Events are immutable once written and ordered by `created_at`
//! ascending; every derived view (usage counts, rollups, leaderboards)
//! reads whatever is committed so far, uncoordinated with ingest.
//!
//! Queries use runtime-bound sqlx so the workspace builds without a
//! database connection.

use crate::entities::ActionType;
use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use rust_decimal::Decimal;
use time::PrimitiveDateTime;
use uuid::Uuid;

/// One persisted tracking event.
///
/// Exactly one of `{(casino_id, bonus_id), search_term}` is populated,
/// determined by `action_type`; `path` is advisory. `created_at` is UTC.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TrackingEvent {
    pub id: Uuid,
    pub action_type: ActionType,
    pub casino_id: Option<Uuid>,
    pub bonus_id: Option<Uuid>,
    pub search_term: Option<String>,
    pub path: Option<String>,
    pub created_at: PrimitiveDateTime,
}

/// Offer-action count for one casino within a query window.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CasinoClaimCount {
    pub casino_id: Uuid,
    pub claims: i64,
}

/// Claim count for one bonus.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct BonusClaimCount {
    pub bonus_id: Uuid,
    pub claims: i64,
}

const EVENT_COLUMNS: &str =
    "id, action_type, casino_id, bonus_id, search_term, path, created_at";

/// SQL fragment matching the two offer action types.
const OFFER_ACTIONS: &str = "action_type IN ('code_copy', 'offer_click')";

#[derive(Debug, Clone)]
/// Append one validated tracking event.
pub struct InsertTrackingEvent {
    pub id: Uuid,
    pub action_type: ActionType,
    pub casino_id: Option<Uuid>,
    pub bonus_id: Option<Uuid>,
    pub search_term: Option<String>,
    pub path: Option<String>,
    pub created_at: PrimitiveDateTime,
}

impl Processor<InsertTrackingEvent> for DatabaseProcessor {
    type Output = ();
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:InsertTrackingEvent")]
    async fn process(&self, insert: InsertTrackingEvent) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO tracking_events
                (id, action_type, casino_id, bonus_id, search_term, path, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(insert.id)
        .bind(insert.action_type)
        .bind(insert.casino_id)
        .bind(insert.bonus_id)
        .bind(insert.search_term)
        .bind(insert.path)
        .bind(insert.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Count offer actions for a `(casino, bonus)` pair since an instant
/// (the ingest response's same-day usage count).
pub struct CountPairUsageSince {
    pub casino_id: Uuid,
    pub bonus_id: Uuid,
    pub since: PrimitiveDateTime,
}

impl Processor<CountPairUsageSince> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountPairUsageSince")]
    async fn process(&self, query: CountPairUsageSince) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM tracking_events \
             WHERE {OFFER_ACTIONS} AND casino_id = $1 AND bonus_id = $2 AND created_at >= $3"
        ))
        .bind(query.casino_id)
        .bind(query.bonus_id)
        .bind(query.since)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Count offer actions for a bonus since an instant (usage lookup API).
pub struct CountBonusUsageSince {
    pub bonus_id: Uuid,
    pub since: PrimitiveDateTime,
}

impl Processor<CountBonusUsageSince> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountBonusUsageSince")]
    async fn process(&self, query: CountBonusUsageSince) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM tracking_events \
             WHERE {OFFER_ACTIONS} AND bonus_id = $1 AND created_at >= $2"
        ))
        .bind(query.bonus_id)
        .bind(query.since)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Most recent offer action for a bonus, regardless of day.
pub struct GetBonusLastUsed {
    pub bonus_id: Uuid,
}

impl Processor<GetBonusLastUsed> for DatabaseProcessor {
    type Output = Option<PrimitiveDateTime>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetBonusLastUsed")]
    async fn process(&self, query: GetBonusLastUsed) -> Result<Option<PrimitiveDateTime>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<PrimitiveDateTime>>(&format!(
            "SELECT MAX(created_at) FROM tracking_events \
             WHERE {OFFER_ACTIONS} AND bonus_id = $1"
        ))
        .bind(query.bonus_id)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Fetch offer events within a resolved `[start, end)` window, ascending.
///
/// `limit` is the row cap the analytics engine applies to unbounded
/// (`alltime`) pulls; bounded windows pass `None`. A capped fetch keeps
/// the newest rows (truncation drops the oldest events) and still
/// returns them in ascending order.
pub struct GetOfferEventsInWindow {
    pub start: PrimitiveDateTime,
    pub end: PrimitiveDateTime,
    pub casino_id: Option<Uuid>,
    pub limit: Option<i64>,
}

impl Processor<GetOfferEventsInWindow> for DatabaseProcessor {
    type Output = Vec<TrackingEvent>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetOfferEventsInWindow")]
    async fn process(&self, query: GetOfferEventsInWindow) -> Result<Vec<TrackingEvent>, sqlx::Error> {
        let mut builder = sqlx::QueryBuilder::new(format!(
            "SELECT {EVENT_COLUMNS} FROM tracking_events \
             WHERE {OFFER_ACTIONS} AND created_at >= "
        ));
        builder.push_bind(query.start);
        builder.push(" AND created_at < ");
        builder.push_bind(query.end);
        if let Some(casino_id) = query.casino_id {
            builder.push(" AND casino_id = ");
            builder.push_bind(casino_id);
        }
        // Capped: take from the newest end, then restore ascending order.
        if let Some(limit) = query.limit {
            builder.push(" ORDER BY created_at DESC LIMIT ");
            builder.push_bind(limit);
        } else {
            builder.push(" ORDER BY created_at ASC");
        }

        let mut events = builder
            .build_query_as::<TrackingEvent>()
            .fetch_all(&self.pool)
            .await?;
        if query.limit.is_some() {
            events.sort_by_key(|event| event.created_at);
        }
        Ok(events)
    }
}

#[derive(Debug, Clone)]
/// Most recent offer events, newest first, for activity feeds.
pub struct GetRecentOfferEvents {
    pub casino_id: Option<Uuid>,
    pub limit: i64,
}

impl Processor<GetRecentOfferEvents> for DatabaseProcessor {
    type Output = Vec<TrackingEvent>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetRecentOfferEvents")]
    async fn process(&self, query: GetRecentOfferEvents) -> Result<Vec<TrackingEvent>, sqlx::Error> {
        let mut builder = sqlx::QueryBuilder::new(format!(
            "SELECT {EVENT_COLUMNS} FROM tracking_events WHERE {OFFER_ACTIONS}"
        ));
        if let Some(casino_id) = query.casino_id {
            builder.push(" AND casino_id = ");
            builder.push_bind(casino_id);
        }
        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(query.limit);

        builder
            .build_query_as::<TrackingEvent>()
            .fetch_all(&self.pool)
            .await
    }
}

#[derive(Debug, Clone)]
/// Offer-action counts per casino since an instant (weekly leaderboard
/// input). Rows come back in first-event order; ranking applies its own
/// stable sort.
pub struct CountClaimsByCasinoSince {
    pub since: PrimitiveDateTime,
}

impl Processor<CountClaimsByCasinoSince> for DatabaseProcessor {
    type Output = Vec<CasinoClaimCount>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountClaimsByCasinoSince")]
    async fn process(&self, query: CountClaimsByCasinoSince) -> Result<Vec<CasinoClaimCount>, sqlx::Error> {
        sqlx::query_as::<_, CasinoClaimCount>(&format!(
            "SELECT casino_id, COUNT(*) AS claims FROM tracking_events \
             WHERE {OFFER_ACTIONS} AND casino_id IS NOT NULL AND created_at >= $1 \
             GROUP BY casino_id \
             ORDER BY MIN(created_at) ASC"
        ))
        .bind(query.since)
        .fetch_all(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// All-time offer-action count for one casino.
pub struct CountCasinoClaims {
    pub casino_id: Uuid,
}

impl Processor<CountCasinoClaims> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountCasinoClaims")]
    async fn process(&self, query: CountCasinoClaims) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM tracking_events \
             WHERE {OFFER_ACTIONS} AND casino_id = $1"
        ))
        .bind(query.casino_id)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// The single most-claimed bonus for one action type, if any events of
/// that type exist. The fallback chain across action types is decided by
/// the statistics aggregator, not here.
pub struct GetMostClaimedBonus {
    pub action_type: ActionType,
}

impl Processor<GetMostClaimedBonus> for DatabaseProcessor {
    type Output = Option<BonusClaimCount>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetMostClaimedBonus")]
    async fn process(&self, query: GetMostClaimedBonus) -> Result<Option<BonusClaimCount>, sqlx::Error> {
        sqlx::query_as::<_, BonusClaimCount>(
            "SELECT bonus_id, COUNT(*) AS claims FROM tracking_events \
             WHERE action_type = $1 AND bonus_id IS NOT NULL \
             GROUP BY bonus_id \
             ORDER BY claims DESC, MIN(created_at) ASC \
             LIMIT 1",
        )
        .bind(query.action_type)
        .fetch_optional(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Total event count for one action type.
pub struct CountEventsOfType {
    pub action_type: ActionType,
}

impl Processor<CountEventsOfType> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountEventsOfType")]
    async fn process(&self, query: CountEventsOfType) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tracking_events WHERE action_type = $1",
        )
        .bind(query.action_type)
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Distinct non-null paths of `page_visit` events — the primary
/// unique-actor signal.
pub struct CountDistinctVisitorPaths;

impl Processor<CountDistinctVisitorPaths> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountDistinctVisitorPaths")]
    async fn process(&self, _query: CountDistinctVisitorPaths) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT path) FROM tracking_events \
             WHERE action_type = 'page_visit' AND path IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Distinct non-null paths of offer actions — the coarser unique-actor
/// fallback when no presence events exist.
pub struct CountDistinctOfferPaths;

impl Processor<CountDistinctOfferPaths> for DatabaseProcessor {
    type Output = i64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CountDistinctOfferPaths")]
    async fn process(&self, _query: CountDistinctOfferPaths) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(DISTINCT path) FROM tracking_events \
             WHERE {OFFER_ACTIONS} AND path IS NOT NULL"
        ))
        .fetch_one(&self.pool)
        .await
    }
}

#[derive(Debug, Clone)]
/// Sum of the bonus values behind every `code_copy` event (the "total
/// claimed value" headline figure).
pub struct SumClaimedValue;

impl Processor<SumClaimedValue> for DatabaseProcessor {
    type Output = Decimal;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:SumClaimedValue")]
    async fn process(&self, _query: SumClaimedValue) -> Result<Decimal, sqlx::Error> {
        sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(b.value), 0) \
             FROM tracking_events e \
             JOIN bonuses b ON b.id = e.bonus_id \
             WHERE e.action_type = 'code_copy'",
        )
        .fetch_one(&self.pool)
        .await
    }
}
