//! Response shapes for the analytics, leaderboard and statistics APIs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::tracking::ActionType;

/// `GET /analytics` query parameters.
///
/// `timeframe` is one of `today`, `yesterday`, `7days`, `30days`,
/// `alltime` or `custom`; `custom` requires `startDate`/`endDate`
/// (ISO calendar dates in the site-local calendar).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casino_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,
}

/// One site-local calendar day's aggregated counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub date: Date,
    pub copies: i64,
    pub clicks: i64,
    pub total: i64,
}

/// Window-wide totals across all buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityTotals {
    pub copies: i64,
    pub clicks: i64,
    pub total: i64,
}

/// Per-casino counts within the resolved window (overall view).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasinoActivityRow {
    pub casino_id: Uuid,
    /// Display name; `None` when the casino no longer exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub copies: i64,
    pub clicks: i64,
    pub total: i64,
}

/// Per-bonus counts within one casino (entity-scoped view).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusActivityRow {
    pub bonus_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub copies: i64,
    pub clicks: i64,
    pub total: i64,
}

/// One recent event for activity feeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
    pub id: Uuid,
    pub action_type: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casino_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Casino display snapshot used by analytics responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasinoDetail {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// `GET /analytics` response.
///
/// The overall view populates `overall` + `casino_analytics`; the
/// casino-scoped view populates `casino_details` + `bonus_details`.
/// `daily_activity` and `recent_activity` are always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall: Option<ActivityTotals>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casino_details: Option<CasinoDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casino_analytics: Option<Vec<CasinoActivityRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_details: Option<Vec<BonusActivityRow>>,
    pub daily_activity: Vec<DailyActivity>,
    pub recent_activity: Vec<RecentActivity>,
}

/// Headline numbers for one casino's analytics page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasinoStats {
    pub total_claims: i64,
    pub weekly_total: i64,
    /// 1-based position on the trailing-7-day leaderboard; a casino with
    /// zero events ranks last + 1, never "unranked".
    pub weekly_leaderboard_position: usize,
}

/// `GET /casinos/{idOrSlug}/analytics` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CasinoStatsResponse {
    pub casino: CasinoDetail,
    pub stats: CasinoStats,
    pub chart_data: Vec<DailyActivity>,
    pub recent_activity: Vec<RecentActivity>,
}

/// The most-claimed offer, when one exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MostClaimedOffer {
    pub bonus_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casino_name: Option<String>,
    pub claims: i64,
}

/// `GET /statistics` response.
///
/// The shape is stable: on internal failure the server returns the same
/// fields zeroed plus `error`, so a dashboard never has to handle a 500
/// from this endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub total_users: i64,
    pub total_bonuses_claimed: i64,
    pub total_offers_available: i64,
    pub most_claimed_offer: Option<MostClaimedOffer>,
    pub total_claimed_value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatisticsResponse {
    /// The zero-valued fallback shape returned when aggregation fails.
    pub fn zeroed(error: impl Into<String>) -> Self {
        Self {
            total_users: 0,
            total_bonuses_claimed: 0,
            total_offers_available: 0,
            most_claimed_offer: None,
            total_claimed_value: Decimal::ZERO,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_statistics_keep_the_full_shape() {
        let resp = StatisticsResponse::zeroed("aggregation failed");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"totalBonusesClaimed\":0"));
        assert!(json.contains("\"mostClaimedOffer\":null"));
        assert!(json.contains("\"error\":\"aggregation failed\""));
    }

    #[test]
    fn analytics_query_parses_camel_case() {
        let q: AnalyticsQuery = serde_json::from_str(
            r#"{"timeframe":"7days","casinoId":"00000000-0000-0000-0000-000000000000"}"#,
        )
        .unwrap();
        assert_eq!(q.timeframe.as_deref(), Some("7days"));
        assert!(q.casino_id.is_some());
        assert!(q.start_date.is_none());
    }

    #[test]
    fn daily_activity_serializes_iso_date() {
        let day = DailyActivity {
            date: time::macros::date!(2026 - 08 - 30),
            copies: 2,
            clicks: 1,
            total: 3,
        };
        let json = serde_json::to_string(&day).unwrap();
        assert!(json.contains("\"date\":\"2026-08-30\""));
    }
}
