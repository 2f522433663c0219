//! Request/response shapes for the tracking ingest API.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// The kind of user action a tracking event records.
///
/// This is the API/DTO version. For database operations, see
/// `claimstream_core::entities::ActionType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    CodeCopy,
    OfferClick,
    Search,
    PageVisit,
}

impl ActionType {
    /// Offer actions reference a `(casino, bonus)` pair and feed the
    /// analytics rollup and the live notification stream.
    pub fn is_offer_action(self) -> bool {
        matches!(self, ActionType::CodeCopy | ActionType::OfferClick)
    }

    /// The wire name of this action (`code_copy`, `offer_click`, …).
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::CodeCopy => "code_copy",
            ActionType::OfferClick => "offer_click",
            ActionType::Search => "search",
            ActionType::PageVisit => "page_visit",
        }
    }
}

/// `POST /tracking` request body.
///
/// `action_type` is kept as a raw string so an unrecognized action can be
/// rejected with the API's own validation error instead of a generic
/// deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casino_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    /// Originating page path. Advisory only; used as a coarse actor proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// The persisted part of a successful ingest, echoed back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEvent {
    pub id: Uuid,
    pub action_type: ActionType,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// `POST /tracking` success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackResponse {
    pub success: bool,
    pub tracking: TrackedEvent,
    /// Same-day usage count for the `(casino, bonus)` pair, present only
    /// for offer actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<i64>,
}

/// `GET /tracking?bonusId=…` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageResponse {
    /// Offer-action count for the bonus since site-local midnight.
    pub usage_count: i64,
    /// Timestamp of the most recent offer action for the bonus, if any.
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_used: Option<OffsetDateTime>,
}
