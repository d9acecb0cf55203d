//! Typed badge event model.
//!
//! The three event shapes of the NIP-58 badge profile — Definition (kind
//! 30009), Award (kind 8), Profile Badges (kind 30008) — plus the
//! canonical NIP-01 serialization, id computation, and signing that turn
//! them into wire events.

pub mod badge;
pub mod error;
pub mod event;
pub mod profile;

pub use badge::{
    build_award, build_definition, parse_definition, validate_identifier, BadgeDefinition,
    DefinitionRef,
};
pub use error::EventError;
pub use event::{Event, Tag, UnsignedEvent};
pub use profile::{build_profile_badges, AcceptanceEntry, ProfileBadges, PROFILE_BADGES_D_TAG};
