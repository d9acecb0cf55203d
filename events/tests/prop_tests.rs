use proptest::prelude::*;

use laurel_events::{
    build_award, build_profile_badges, AcceptanceEntry, DefinitionRef, ProfileBadges, Tag,
};
use laurel_types::{EventId, PublicKey, Timestamp};

fn pubkey_strategy() -> impl Strategy<Value = PublicKey> {
    prop::array::uniform32(0u8..).prop_map(PublicKey)
}

fn entry_strategy() -> impl Strategy<Value = AcceptanceEntry> {
    (
        prop::array::uniform32(0u8..),
        "[a-z0-9-]{1,16}",
        prop::array::uniform32(0u8..),
        prop::option::of("[a-z.]{3,12}"),
    )
        .prop_map(|(issuer, identifier, award, hint)| {
            let mut entry = AcceptanceEntry::new(
                DefinitionRef::new(PublicKey(issuer), identifier).unwrap(),
                EventId::new(award),
            );
            if let Some(hint) = hint {
                entry = entry.with_relay_hint(format!("wss://{hint}"));
            }
            entry
        })
}

proptest! {
    /// The award's p-tag count equals the recipient list length, in order.
    #[test]
    fn award_recipient_tags_match_input(
        issuer in pubkey_strategy(),
        recipients in prop::collection::vec(pubkey_strategy(), 1..20),
    ) {
        let reference = DefinitionRef::new(issuer, "prop-badge").unwrap();
        let event = build_award(&reference, &recipients, Timestamp::new(0)).unwrap();
        let p_values: Vec<String> = event
            .tags
            .iter()
            .filter(|t| t.name() == Some("p"))
            .filter_map(|t| t.value().map(str::to_string))
            .collect();
        let expected: Vec<String> = recipients.iter().map(PublicKey::to_hex).collect();
        prop_assert_eq!(p_values, expected);
    }

    /// Every built aggregate keeps the a- and e-sequences equal length and
    /// strictly alternating — the positional-pairing invariant.
    #[test]
    fn profile_badges_pairing_invariant(
        recipient in pubkey_strategy(),
        entries in prop::collection::vec(entry_strategy(), 0..12),
    ) {
        let badges = ProfileBadges::new(entries);
        let event = build_profile_badges(&badges, &recipient, Timestamp::new(0)).unwrap();
        let names: Vec<&str> = event.tags.iter().filter_map(Tag::name).collect();

        let a_count = names.iter().filter(|n| **n == "a").count();
        let e_count = names.iter().filter(|n| **n == "e").count();
        prop_assert_eq!(a_count, badges.len());
        prop_assert_eq!(e_count, badges.len());

        // Alternation: after the d tag, pairs are always a-then-e.
        prop_assert_eq!(names.first().copied(), Some("d"));
        for pair in names[1..].chunks(2) {
            prop_assert_eq!(pair, ["a", "e"]);
        }
    }
}
