use proptest::prelude::*;

use laurel_engine::merge_acceptance;
use laurel_events::{build_profile_badges, AcceptanceEntry, DefinitionRef, ProfileBadges};
use laurel_types::{EventId, PublicKey, Timestamp};

fn entry_strategy() -> impl Strategy<Value = AcceptanceEntry> {
    ("[a-z0-9]{1,12}", 0u8..8).prop_map(|(identifier, award)| {
        AcceptanceEntry::new(
            DefinitionRef::new(PublicKey([1u8; 32]), identifier).unwrap(),
            EventId::new([award; 32]),
        )
    })
}

proptest! {
    /// merge(merge(A, e), e) == merge(A, e) for any aggregate A.
    #[test]
    fn merge_is_idempotent(
        entries in prop::collection::vec(entry_strategy(), 0..10),
        e in entry_strategy(),
    ) {
        let base = entries
            .into_iter()
            .fold(None, |acc, entry| Some(merge_acceptance(acc, entry)));
        let once = merge_acceptance(base, e.clone());
        let twice = merge_acceptance(Some(once.clone()), e);
        prop_assert_eq!(twice, once);
    }

    /// Sequential merging keeps first-acceptance order, duplicates dropped.
    #[test]
    fn merge_preserves_order(entries in prop::collection::vec(entry_strategy(), 1..12)) {
        let merged = entries
            .iter()
            .cloned()
            .fold(None, |acc, entry| Some(merge_acceptance(acc, entry)))
            .unwrap();

        let mut expected: Vec<AcceptanceEntry> = Vec::new();
        for entry in &entries {
            if !expected.iter().any(|e| e.same_acceptance(entry)) {
                expected.push(entry.clone());
            }
        }
        prop_assert_eq!(merged.entries(), expected.as_slice());
    }

    /// Every reachable aggregate builds an event with equally long,
    /// alternating a/e sequences.
    #[test]
    fn merged_aggregates_always_pair(entries in prop::collection::vec(entry_strategy(), 0..12)) {
        let merged = entries
            .into_iter()
            .fold(ProfileBadges::default(), |acc, entry| merge_acceptance(Some(acc), entry));
        let event =
            build_profile_badges(&merged, &PublicKey([2u8; 32]), Timestamp::new(0)).unwrap();
        let a_count = event.tags.iter().filter(|t| t.name() == Some("a")).count();
        let e_count = event.tags.iter().filter(|t| t.name() == Some("e")).count();
        prop_assert_eq!(a_count, e_count);
        prop_assert_eq!(a_count, merged.len());
    }
}
