//! Fundamental types for laurel.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: event identifiers, key material, signatures, timestamps, and
//! the event kind numbers of the badge profile.

pub mod event_id;
pub mod keys;
pub mod kind;
pub mod time;

pub use event_id::EventId;
pub use keys::{PrivateKey, PublicKey, Sig};
pub use kind::{
    is_parameterized_replaceable, KIND_BADGE_AWARD, KIND_BADGE_DEFINITION, KIND_PROFILE_BADGES,
};
pub use time::Timestamp;
