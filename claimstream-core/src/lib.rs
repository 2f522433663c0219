#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod analytics;
pub mod entities;
pub mod events;
pub mod framework;
pub mod ingest;
pub mod processors;
