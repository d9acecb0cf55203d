//! Relay client for laurel.
//!
//! Publishes signed events to a set of independent relays concurrently,
//! classifying each relay's outcome separately, and fetches the current
//! version of replaceable events with a deterministic latest-wins rule.

pub mod client;
pub mod error;
pub mod fetch;
pub mod wire;

pub use client::{
    publish_event, publish_event_until, PublishOptions, PublishReport, PublishStatus, RelayOutcome,
    RelayReport,
};
pub use error::RelayError;
pub use fetch::fetch_latest;
pub use wire::{ClientMessage, Filter, RelayMessage};
