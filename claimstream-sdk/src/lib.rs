//! Shared wire types and typed clients for the claimstream engagement
//! tracking service.
//!
//! The `objects` module holds the JSON shapes exchanged with the server.
//! The `client` module (behind the `client` cargo feature) provides typed
//! HTTP clients, the live-notification stream consumer and the client-side
//! notification feed lifecycle.

pub mod objects;

#[cfg(feature = "client")]
pub mod client;
