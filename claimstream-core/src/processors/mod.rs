//! Side-effect processors triggered by ingest.
//!
//! - `NotificationPublisher`: decorates offer events with entity display
//!   metadata and publishes them to the hub, fire-and-forget.

pub mod notifier;

pub use notifier::NotificationPublisher;
