//! The acceptance merger.

use laurel_events::{AcceptanceEntry, ProfileBadges};

/// Compute the next aggregate from the current one and a new acceptance.
///
/// Re-accepting an already-present `(definition, award)` pair returns the
/// current aggregate unchanged, so replayed acceptances are no-ops. A new
/// entry is appended after all existing ones — acceptance order is display
/// order. Always builds a fresh aggregate; the input is never mutated, so a
/// failed downstream stage leaves the caller's view of "current" intact
/// for a safe retry.
pub fn merge_acceptance(current: Option<ProfileBadges>, entry: AcceptanceEntry) -> ProfileBadges {
    let Some(current) = current else {
        return ProfileBadges::new(vec![entry]);
    };
    if current.contains(&entry) {
        return current;
    }
    let mut entries = current.entries().to_vec();
    entries.push(entry);
    ProfileBadges::new(entries)
}
