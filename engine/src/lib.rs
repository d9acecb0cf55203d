//! Badge lifecycle engine.
//!
//! Orchestrates the three top-level operations — create a definition,
//! award a badge, accept an award — on top of the event builders, the
//! acceptance merger, and the relay client. The engine holds configuration
//! only; keys and selections are explicit parameters on every call.

pub mod archive;
pub mod config;
pub mod definitions;
pub mod engine;
pub mod error;
pub mod merge;

pub use archive::archive_event;
pub use config::Config;
pub use definitions::load_definitions;
pub use engine::{
    AcceptOutcome, AggregateSource, AwardOutcome, BadgeEngine, DefinitionStatus,
    RelayAggregateSource,
};
pub use error::{EngineError, Stage};
pub use merge::merge_acceptance;
