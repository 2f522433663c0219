//! The process-wide publish/subscribe notification hub.
//!
//! The hub is an explicit, injectable object (shared as
//! `Arc<NotificationHub>` in server state) rather than a module-level
//! singleton, so a multi-instance deployment can substitute an external
//! broker behind the same narrow interface. Within one process it is the
//! only shared mutable state of the tracking core.
//!
//! Concurrency contract: `subscribe`, `publish`, `unsubscribe` and
//! `subscriber_count` are all safe to call concurrently from any number
//! of request handlers. Delivery uses non-blocking `try_send`, so one
//! slow or dead subscriber can never block the publisher or the other
//! subscribers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use claimstream_sdk::objects::LiveNotification;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Per-subscriber channel capacity.
///
/// Enough to absorb bursts; a subscriber that falls this far behind
/// starts missing events (acceptable for a live feed).
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 256;

/// Process-wide registry of live-stream subscribers.
pub struct NotificationHub {
    subscribers: Mutex<HashMap<Uuid, mpsc::Sender<LiveNotification>>>,
    buffer: usize,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::with_buffer(DEFAULT_SUBSCRIBER_BUFFER)
    }

    /// Override the per-subscriber buffer (primarily for tests).
    pub fn with_buffer(buffer: usize) -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            buffer,
        }
    }

    /// Register a new listener.
    ///
    /// The subscription starts empty: nothing published before this call
    /// is ever delivered. Dropping the returned [`Subscription`]
    /// unsubscribes synchronously.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let token = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(self.buffer);
        self.lock().insert(token, tx);
        tracing::debug!(%token, "stream subscriber registered");
        Subscription {
            token,
            rx,
            hub: Arc::clone(self),
        }
    }

    /// Deliver an event to every currently registered listener.
    ///
    /// Never blocks and never reports failure to the caller: a full
    /// subscriber misses this event, a closed one is pruned.
    pub fn publish(&self, event: &LiveNotification) {
        let mut stale = Vec::new();
        let mut guard = self.lock();
        for (token, tx) in guard.iter() {
            match tx.try_send(event.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!(subscriber = %token, event = %event.id, "subscriber buffer full, dropping event");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    stale.push(*token);
                }
            }
        }
        for token in stale {
            guard.remove(&token);
            tracing::debug!(subscriber = %token, "pruned closed stream subscriber");
        }
    }

    /// Remove a listener. Idempotent; unknown tokens are ignored.
    pub fn unsubscribe(&self, token: Uuid) {
        if self.lock().remove(&token).is_some() {
            tracing::debug!(%token, "stream subscriber removed");
        }
    }

    /// Number of currently registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    /// The map is only ever held for short, non-blocking operations, so
    /// a poisoned lock (a panicked holder) is recoverable.
    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, mpsc::Sender<LiveNotification>>> {
        match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// One live listener's receiving end.
///
/// Unsubscribes from the hub on drop, so a disconnected stream releases
/// its registry slot synchronously and the hub never retains a dead
/// listener.
pub struct Subscription {
    token: Uuid,
    rx: mpsc::Receiver<LiveNotification>,
    hub: Arc<NotificationHub>,
}

impl Subscription {
    /// The opaque token identifying this listener in the hub.
    pub fn token(&self) -> Uuid {
        self.token
    }

    /// Wait for the next published notification.
    ///
    /// Returns `None` only if the hub dropped this subscriber's sender
    /// (i.e. after [`NotificationHub::unsubscribe`]).
    pub async fn recv(&mut self) -> Option<LiveNotification> {
        self.rx.recv().await
    }

    /// Non-blocking receive, for draining in tests.
    pub fn try_recv(&mut self) -> Option<LiveNotification> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn event(id: Uuid) -> LiveNotification {
        LiveNotification {
            id,
            casino_name: "Golden Palm".into(),
            casino_logo: "/img/golden-palm.png".into(),
            casino_slug: "golden-palm".into(),
            bonus_title: "50 Free Spins".into(),
            bonus_code: Some("PALM50".into()),
            created_at: datetime!(2026-08-30 09:00:00 UTC),
        }
    }

    #[tokio::test]
    async fn publish_reaches_every_subscriber() {
        let hub = Arc::new(NotificationHub::new());
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();

        let id = Uuid::new_v4();
        hub.publish(&event(id));

        assert_eq!(a.recv().await.map(|n| n.id), Some(id));
        assert_eq!(b.recv().await.map(|n| n.id), Some(id));
    }

    #[tokio::test]
    async fn new_subscribers_see_no_backlog() {
        let hub = Arc::new(NotificationHub::new());
        hub.publish(&event(Uuid::new_v4()));

        let mut late = hub.subscribe();
        assert!(late.try_recv().is_none());
    }

    #[tokio::test]
    async fn subscriber_count_returns_to_baseline_after_drops() {
        let hub = Arc::new(NotificationHub::new());
        let baseline = hub.subscriber_count();

        let subscriptions: Vec<_> = (0..5).map(|_| hub.subscribe()).collect();
        assert_eq!(hub.subscriber_count(), baseline + 5);

        drop(subscriptions);
        assert_eq!(hub.subscriber_count(), baseline);
    }

    #[tokio::test]
    async fn unsubscribe_is_idempotent() {
        let hub = Arc::new(NotificationHub::new());
        let sub = hub.subscribe();
        let token = sub.token();

        hub.unsubscribe(token);
        hub.unsubscribe(token);
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn full_subscriber_does_not_block_or_starve_others() {
        let hub = Arc::new(NotificationHub::with_buffer(1));
        let mut stuck = hub.subscribe();
        let mut live = hub.subscribe();

        hub.publish(&event(Uuid::new_v4()));
        assert!(live.recv().await.is_some());
        // `stuck` never drains; its buffer is now full.

        let second = Uuid::new_v4();
        hub.publish(&event(second));
        assert_eq!(live.recv().await.map(|n| n.id), Some(second));

        // The stuck subscriber kept its first event and dropped the rest.
        assert!(stuck.try_recv().is_some());
        assert!(stuck.try_recv().is_none());
    }

    #[tokio::test]
    async fn recv_ends_after_forced_unsubscribe() {
        let hub = Arc::new(NotificationHub::new());
        let mut sub = hub.subscribe();
        hub.unsubscribe(sub.token());

        assert!(sub.recv().await.is_none());
    }
}
