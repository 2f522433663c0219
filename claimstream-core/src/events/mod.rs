//! Live event distribution.
//!
//! Ingest publishes decorated notifications into the [`hub`], which fans
//! them out to every currently connected stream. The hub holds no
//! history: a listener that is not subscribed at publish time misses
//! that event permanently. This is a live feed, not a delivery queue.

pub mod hub;

pub use hub::{DEFAULT_SUBSCRIBER_BUFFER, NotificationHub, Subscription};
