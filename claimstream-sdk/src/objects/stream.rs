//! Message types for the live notification stream.
//!
//! The `GET /notifications/stream` endpoint is a persistent
//! `text/event-stream` response pushing [`StreamMessage`] JSON payloads.
//!
//! # Protocol
//!
//! 1. The server sends `{"type":"connected"}` immediately after the
//!    response headers.
//! 2. Whenever an offer action is ingested, the decorated
//!    [`LiveNotification`] object is pushed as-is (no `type` tag).
//! 3. While idle, the server sends `{"type":"heartbeat"}` at a fixed
//!    interval so intermediary proxies do not close the connection.
//!
//! The feed is live-only: subscribers see nothing that happened before
//! they connected, and a missed message is never redelivered.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A tracking event of type `code_copy`/`offer_click`, enriched at
/// broadcast time with a denormalized snapshot of the referenced casino
/// and bonus. Ephemeral; lives for one push cycle and is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveNotification {
    /// The originating tracking event id; clients dedup on this.
    pub id: Uuid,
    pub casino_name: String,
    pub casino_logo: String,
    pub casino_slug: String,
    pub bonus_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_code: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Control frames interleaved with notifications on the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// First frame after the connection opens.
    Connected,
    /// Periodic keep-alive while no notifications are flowing.
    Heartbeat,
}

/// Any payload a stream client can receive.
///
/// Control frames carry a `"type"` discriminator; notifications are bare
/// objects, so the untagged representation matches the wire format in
/// both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreamMessage {
    Control(ControlMessage),
    Notification(LiveNotification),
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample_notification() -> LiveNotification {
        LiveNotification {
            id: Uuid::nil(),
            casino_name: "Royal Flamingo".into(),
            casino_logo: "/img/royal-flamingo.png".into(),
            casino_slug: "royal-flamingo".into(),
            bonus_title: "100 Free Spins".into(),
            bonus_code: Some("SPIN100".into()),
            created_at: datetime!(2026-08-30 12:00:00 UTC),
        }
    }

    #[test]
    fn control_frames_are_tagged() {
        assert_eq!(
            serde_json::to_string(&StreamMessage::Control(ControlMessage::Connected)).unwrap(),
            r#"{"type":"connected"}"#
        );
        assert_eq!(
            serde_json::to_string(&StreamMessage::Control(ControlMessage::Heartbeat)).unwrap(),
            r#"{"type":"heartbeat"}"#
        );
    }

    #[test]
    fn notification_round_trips_untagged() {
        let msg = StreamMessage::Notification(sample_notification());
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("\"type\""));
        assert!(json.contains("\"casinoName\":\"Royal Flamingo\""));
        let back: StreamMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn heartbeat_parses_as_control_not_notification() {
        let msg: StreamMessage = serde_json::from_str(r#"{"type":"heartbeat"}"#).unwrap();
        assert_eq!(msg, StreamMessage::Control(ControlMessage::Heartbeat));
    }

    #[test]
    fn bonus_code_is_omitted_when_absent() {
        let mut n = sample_notification();
        n.bonus_code = None;
        let json = serde_json::to_string(&n).unwrap();
        assert!(!json.contains("bonusCode"));
    }
}
