//! Event kind numbers for the badge profile.

/// Badge Definition — parameterized replaceable, keyed by issuer + `d` tag.
pub const KIND_BADGE_DEFINITION: u32 = 30009;

/// Badge Award — a regular, immutable event.
pub const KIND_BADGE_AWARD: u32 = 8;

/// Profile Badges — parameterized replaceable, keyed by recipient + `d` tag.
pub const KIND_PROFILE_BADGES: u32 = 30008;

/// Whether a kind is parameterized replaceable: only the latest event per
/// `(author, kind, d-tag)` triple is current.
pub fn is_parameterized_replaceable(kind: u32) -> bool {
    (30000..40000).contains(&kind)
}
