//! The Profile Badges aggregate: strict paired-tag parsing and building.
//!
//! A recipient's aggregate is one kind 30008 event whose tags are the
//! `d` tag followed by strictly alternating `a`/`e` pairs. Entry *i*'s
//! definition coordinate and award reference sit at pair position *i*;
//! inserting into one sequence without the other is what makes a badge
//! silently disappear in clients, so the parser refuses any desynchronized
//! layout instead of guessing alignment.

use crate::badge::{validate_identifier, DefinitionRef};
use crate::event::{Event, Tag, UnsignedEvent};
use crate::EventError;
use laurel_types::{EventId, PublicKey, Timestamp, KIND_PROFILE_BADGES};

/// The `d` tag value identifying a recipient's profile badges aggregate.
pub const PROFILE_BADGES_D_TAG: &str = "profile_badges";

/// One accepted badge: a definition coordinate paired with the award event
/// that granted it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcceptanceEntry {
    pub definition: DefinitionRef,
    pub award: EventId,
    /// Relay hint carried on the `e` tag, if any.
    pub relay_hint: Option<String>,
}

impl AcceptanceEntry {
    pub fn new(definition: DefinitionRef, award: EventId) -> Self {
        Self {
            definition,
            award,
            relay_hint: None,
        }
    }

    pub fn with_relay_hint(mut self, relay: impl Into<String>) -> Self {
        self.relay_hint = Some(relay.into());
        self
    }

    /// Two entries are the same acceptance when definition and award match.
    /// The relay hint is bookkeeping, not identity.
    pub fn same_acceptance(&self, other: &Self) -> bool {
        self.definition == other.definition && self.award == other.award
    }
}

/// A recipient's ordered sequence of accepted badges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileBadges {
    entries: Vec<AcceptanceEntry>,
}

impl ProfileBadges {
    pub fn new(entries: Vec<AcceptanceEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[AcceptanceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entry: &AcceptanceEntry) -> bool {
        self.entries.iter().any(|e| e.same_acceptance(entry))
    }

    /// Parse a kind 30008 event into an aggregate.
    ///
    /// Tags with unknown names are tolerated (clients attach extras), but
    /// any `a`/`e` tag out of pair order is corrupt input and is rejected
    /// with the offending event attached.
    pub fn from_event(event: &Event) -> Result<Self, EventError> {
        if event.kind != KIND_PROFILE_BADGES {
            return Err(corrupt(
                event,
                format!("kind {} is not a profile badges event", event.kind),
            ));
        }

        let mut entries = Vec::new();
        let mut pending: Option<DefinitionRef> = None;
        let mut d_seen = false;

        for tag in &event.tags {
            match tag.name() {
                Some("d") => {
                    if d_seen {
                        return Err(corrupt(event, "duplicate d tag"));
                    }
                    if tag.value() != Some(PROFILE_BADGES_D_TAG) {
                        return Err(corrupt(
                            event,
                            format!("d tag is {:?}, not {PROFILE_BADGES_D_TAG:?}", tag.value()),
                        ));
                    }
                    d_seen = true;
                }
                Some("a") => {
                    if pending.is_some() {
                        return Err(corrupt(event, "a tag without a following e tag"));
                    }
                    let value = tag
                        .value()
                        .ok_or_else(|| corrupt(event, "a tag with no value"))?;
                    let definition = value.parse::<DefinitionRef>().map_err(|e| {
                        corrupt(event, format!("bad definition coordinate {value:?}: {e}"))
                    })?;
                    pending = Some(definition);
                }
                Some("e") => {
                    let Some(definition) = pending.take() else {
                        return Err(corrupt(event, "e tag without a preceding a tag"));
                    };
                    let value = tag
                        .value()
                        .ok_or_else(|| corrupt(event, "e tag with no value"))?;
                    let award = EventId::from_hex(value)
                        .ok_or_else(|| corrupt(event, format!("bad award event id {value:?}")))?;
                    entries.push(AcceptanceEntry {
                        definition,
                        award,
                        relay_hint: tag.0.get(2).cloned(),
                    });
                }
                _ => {}
            }
        }

        if pending.is_some() {
            return Err(corrupt(event, "trailing a tag without its e tag"));
        }
        if !d_seen {
            return Err(corrupt(event, "missing d tag"));
        }
        Ok(Self { entries })
    }
}

fn corrupt(event: &Event, reason: impl Into<String>) -> EventError {
    EventError::CorruptAggregate {
        reason: reason.into(),
        event: Box::new(event.clone()),
    }
}

/// Build the kind 30008 aggregate event for a recipient.
///
/// Entries come from the merger and are structurally valid by contract;
/// a malformed one here is a merger bug and fails hard.
pub fn build_profile_badges(
    badges: &ProfileBadges,
    recipient: &PublicKey,
    created_at: Timestamp,
) -> Result<UnsignedEvent, EventError> {
    let mut tags = Vec::with_capacity(1 + badges.len() * 2);
    tags.push(Tag::new(["d", PROFILE_BADGES_D_TAG]));
    for entry in badges.entries() {
        validate_identifier(&entry.definition.identifier).map_err(|e| {
            EventError::InternalInvariant(format!("merger produced an invalid entry: {e}"))
        })?;
        tags.push(Tag::new(["a", entry.definition.to_string().as_str()]));
        let mut e_tag = vec!["e".to_string(), entry.award.to_hex()];
        if let Some(hint) = &entry.relay_hint {
            e_tag.push(hint.clone());
        }
        tags.push(Tag(e_tag));
    }
    Ok(UnsignedEvent {
        pubkey: *recipient,
        created_at,
        kind: KIND_PROFILE_BADGES,
        tags,
        content: format!("Profile badges: {} badges displayed", badges.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use laurel_crypto::public_from_private;
    use laurel_types::PrivateKey;

    fn recipient() -> (PrivateKey, PublicKey) {
        let private = PrivateKey([3u8; 32]);
        let public = public_from_private(&private).unwrap();
        (private, public)
    }

    fn entry(id_byte: u8, identifier: &str) -> AcceptanceEntry {
        let issuer = public_from_private(&PrivateKey([11u8; 32])).unwrap();
        AcceptanceEntry::new(
            DefinitionRef::new(issuer, identifier).unwrap(),
            EventId::new([id_byte; 32]),
        )
    }

    fn signed_aggregate(entries: Vec<AcceptanceEntry>) -> Event {
        let (sk, pk) = recipient();
        build_profile_badges(&ProfileBadges::new(entries), &pk, Timestamp::new(1_700_000_000))
            .unwrap()
            .sign(&sk)
            .unwrap()
    }

    #[test]
    fn build_then_parse_roundtrip() {
        let entries = vec![
            entry(1, "first-badge"),
            entry(2, "second-badge").with_relay_hint("wss://relay.example"),
        ];
        let event = signed_aggregate(entries.clone());
        let parsed = ProfileBadges::from_event(&event).unwrap();
        assert_eq!(parsed.entries(), entries.as_slice());
    }

    #[test]
    fn built_event_pairs_positionally() {
        let event = signed_aggregate(vec![entry(1, "a-badge"), entry(2, "b-badge")]);
        let names: Vec<&str> = event.tags.iter().filter_map(Tag::name).collect();
        assert_eq!(names, vec!["d", "a", "e", "a", "e"]);
        let a_count = names.iter().filter(|n| **n == "a").count();
        let e_count = names.iter().filter(|n| **n == "e").count();
        assert_eq!(a_count, e_count);
    }

    #[test]
    fn empty_aggregate_builds_and_parses() {
        let event = signed_aggregate(Vec::new());
        let parsed = ProfileBadges::from_event(&event).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn orphan_a_tag_is_corrupt() {
        let (sk, pk) = recipient();
        let mut unsigned =
            build_profile_badges(&ProfileBadges::new(vec![entry(1, "ok")]), &pk, Timestamp::new(0))
                .unwrap();
        // Drop the e tag so the a tag dangles.
        unsigned.tags.pop();
        let event = unsigned.sign(&sk).unwrap();
        let err = ProfileBadges::from_event(&event).unwrap_err();
        assert!(matches!(err, EventError::CorruptAggregate { .. }));
    }

    #[test]
    fn orphan_e_tag_is_corrupt() {
        let (sk, pk) = recipient();
        let mut unsigned = build_profile_badges(&ProfileBadges::default(), &pk, Timestamp::new(0))
            .unwrap();
        unsigned
            .tags
            .push(Tag::new(["e", "aa".repeat(32).as_str()]));
        let event = unsigned.sign(&sk).unwrap();
        let err = ProfileBadges::from_event(&event).unwrap_err();
        assert!(matches!(err, EventError::CorruptAggregate { .. }));
    }

    #[test]
    fn adjacent_a_tags_are_corrupt() {
        let (sk, pk) = recipient();
        let reference = entry(1, "ok").definition;
        let event = UnsignedEvent {
            pubkey: pk,
            created_at: Timestamp::new(0),
            kind: KIND_PROFILE_BADGES,
            tags: vec![
                Tag::new(["d", PROFILE_BADGES_D_TAG]),
                Tag::new(["a", reference.to_string().as_str()]),
                Tag::new(["a", reference.to_string().as_str()]),
                Tag::new(["e", "bb".repeat(32).as_str()]),
            ],
            content: String::new(),
        }
        .sign(&sk)
        .unwrap();
        let err = ProfileBadges::from_event(&event).unwrap_err();
        assert!(matches!(err, EventError::CorruptAggregate { .. }));
    }

    #[test]
    fn corrupt_error_carries_the_offending_event() {
        let (sk, pk) = recipient();
        let event = UnsignedEvent {
            pubkey: pk,
            created_at: Timestamp::new(0),
            kind: KIND_PROFILE_BADGES,
            tags: vec![Tag::new(["d", "something_else"])],
            content: String::new(),
        }
        .sign(&sk)
        .unwrap();
        match ProfileBadges::from_event(&event).unwrap_err() {
            EventError::CorruptAggregate { event: carried, .. } => {
                assert_eq!(*carried, event);
            }
            other => panic!("expected CorruptAggregate, got {other:?}"),
        }
    }

    #[test]
    fn wrong_kind_rejected() {
        let (sk, pk) = recipient();
        let event = UnsignedEvent {
            pubkey: pk,
            created_at: Timestamp::new(0),
            kind: 1,
            tags: vec![Tag::new(["d", PROFILE_BADGES_D_TAG])],
            content: String::new(),
        }
        .sign(&sk)
        .unwrap();
        assert!(ProfileBadges::from_event(&event).is_err());
    }

    #[test]
    fn unknown_tags_are_tolerated() {
        let (sk, pk) = recipient();
        let reference = entry(1, "ok");
        let event = UnsignedEvent {
            pubkey: pk,
            created_at: Timestamp::new(0),
            kind: KIND_PROFILE_BADGES,
            tags: vec![
                Tag::new(["d", PROFILE_BADGES_D_TAG]),
                Tag::new(["client", "some-client"]),
                Tag::new(["a", reference.definition.to_string().as_str()]),
                Tag::new(["e", reference.award.to_hex().as_str()]),
            ],
            content: String::new(),
        }
        .sign(&sk)
        .unwrap();
        let parsed = ProfileBadges::from_event(&event).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn relay_hint_preserved_through_roundtrip() {
        let with_hint = entry(4, "hinted").with_relay_hint("wss://nos.example");
        let event = signed_aggregate(vec![with_hint.clone()]);
        let parsed = ProfileBadges::from_event(&event).unwrap();
        assert_eq!(
            parsed.entries()[0].relay_hint.as_deref(),
            Some("wss://nos.example")
        );
    }
}
