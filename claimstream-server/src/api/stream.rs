//! `GET /notifications/stream` — the live notification stream.
//!
//! Speaks the protocol documented on `claimstream_sdk::objects::stream`:
//! a `connected` control frame first, then decorated notifications as
//! they are published, with `heartbeat` frames while idle. Dropping the
//! response drops the hub [`Subscription`], which releases the registry
//! slot synchronously.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use futures_util::stream::{self, Stream, StreamExt};
use serde::Serialize;
use tokio::time::{Instant, Interval, interval_at};

use claimstream_core::events::Subscription;
use claimstream_sdk::objects::{ControlMessage, StreamMessage};

use crate::state::AppState;

pub(super) async fn notification_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let heartbeat = state.config.stream.read().await.heartbeat;
    let subscription = state.hub.subscribe();
    tracing::debug!(token = %subscription.token(), "notification stream connected");

    let connected = stream::once(async {
        Ok(json_event(&StreamMessage::Control(ControlMessage::Connected)))
    });

    Sse::new(connected.chain(live_frames(subscription, heartbeat)))
}

/// Interleave published notifications with idle heartbeats.
///
/// The stream ends only if the hub force-unsubscribes this listener;
/// normally it runs until the client disconnects.
fn live_frames(
    subscription: Subscription,
    heartbeat: Duration,
) -> impl Stream<Item = Result<Event, Infallible>> {
    // interval_at: the first heartbeat comes one full period after
    // connect, not immediately after the `connected` frame.
    let ticker = interval_at(Instant::now() + heartbeat, heartbeat);

    stream::unfold(
        (subscription, ticker),
        |(mut subscription, mut ticker): (Subscription, Interval)| async move {
            tokio::select! {
                received = subscription.recv() => {
                    let notification = received?;
                    ticker.reset();
                    let event = json_event(&StreamMessage::Notification(notification));
                    Some((Ok(event), (subscription, ticker)))
                }
                _ = ticker.tick() => {
                    let event = json_event(&StreamMessage::Control(ControlMessage::Heartbeat));
                    Some((Ok(event), (subscription, ticker)))
                }
            }
        },
    )
}

/// Encode a payload as an SSE data frame.
///
/// Serialization of these types cannot fail in practice; if it ever
/// does, the frame degrades to a comment so the stream stays alive.
fn json_event<T: Serialize>(payload: &T) -> Event {
    match Event::default().json_data(payload) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(error = %e, "failed to encode stream frame");
            Event::default().comment("encode error")
        }
    }
}
