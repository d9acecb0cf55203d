//! Core event model: tags, unsigned events, signed wire events.
//!
//! An event id is the SHA-256 of the canonical JSON array
//! `[0, pubkey, created_at, kind, tags, content]`; the signature is BIP-340
//! Schnorr over that id.

use serde::{Deserialize, Serialize};

use crate::EventError;
use laurel_crypto::{sha256, sign_digest, verify_digest};
use laurel_types::{EventId, PrivateKey, PublicKey, Sig, Timestamp};

/// A single event tag: a list of strings, the first being the tag name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag(pub Vec<String>);

impl Tag {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// The tag name (`d`, `a`, `e`, `p`, …), if present.
    pub fn name(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// The first value after the name.
    pub fn value(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }
}

/// The canonical serialization hashed into the event id.
fn canonical_json(
    pubkey: &PublicKey,
    created_at: Timestamp,
    kind: u32,
    tags: &[Tag],
    content: &str,
) -> String {
    serde_json::json!([0, pubkey.to_hex(), created_at.as_secs(), kind, tags, content]).to_string()
}

/// An event before signing: everything except `id` and `sig`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedEvent {
    pub pubkey: PublicKey,
    pub created_at: Timestamp,
    pub kind: u32,
    pub tags: Vec<Tag>,
    pub content: String,
}

impl UnsignedEvent {
    /// Compute the event id over the canonical serialization.
    pub fn id(&self) -> EventId {
        let canonical = canonical_json(
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        );
        EventId::new(sha256(canonical.as_bytes()))
    }

    /// Sign the event, producing the full wire form.
    pub fn sign(self, private: &PrivateKey) -> Result<Event, EventError> {
        let id = self.id();
        let sig = sign_digest(id.as_bytes(), private)?;
        Ok(Event {
            id,
            pubkey: self.pubkey,
            created_at: self.created_at,
            kind: self.kind,
            tags: self.tags,
            content: self.content,
            sig,
        })
    }
}

/// A signed event in wire form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub pubkey: PublicKey,
    pub created_at: Timestamp,
    pub kind: u32,
    pub tags: Vec<Tag>,
    pub content: String,
    pub sig: Sig,
}

impl Event {
    /// Recompute the id from the event body.
    pub fn computed_id(&self) -> EventId {
        let canonical = canonical_json(
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        );
        EventId::new(sha256(canonical.as_bytes()))
    }

    /// Verify that the id matches the body and the signature matches the id.
    pub fn verify(&self) -> bool {
        self.computed_id() == self.id && verify_digest(self.id.as_bytes(), &self.sig, &self.pubkey)
    }

    /// First value of the first tag with the given name.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name() == Some(name))
            .and_then(Tag::value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laurel_crypto::public_from_private;

    fn unsigned(seed: u8) -> (PrivateKey, UnsignedEvent) {
        let private = PrivateKey([seed; 32]);
        let pubkey = public_from_private(&private).unwrap();
        let event = UnsignedEvent {
            pubkey,
            created_at: Timestamp::new(1_700_000_000),
            kind: 1,
            tags: vec![Tag::new(["t", "laurel"])],
            content: "hello".to_string(),
        };
        (private, event)
    }

    #[test]
    fn id_is_deterministic() {
        let (_, ev) = unsigned(1);
        assert_eq!(ev.id(), ev.clone().id());
    }

    #[test]
    fn id_depends_on_every_field() {
        let (_, base) = unsigned(1);
        let mut content = base.clone();
        content.content = "other".to_string();
        assert_ne!(base.id(), content.id());

        let mut tags = base.clone();
        tags.tags.push(Tag::new(["p", "00"]));
        assert_ne!(base.id(), tags.id());

        let mut time = base.clone();
        time.created_at = Timestamp::new(1_700_000_001);
        assert_ne!(base.id(), time.id());
    }

    #[test]
    fn sign_then_verify() {
        let (sk, ev) = unsigned(1);
        let signed = ev.sign(&sk).unwrap();
        assert!(signed.verify());
    }

    #[test]
    fn tampered_content_fails_verification() {
        let (sk, ev) = unsigned(1);
        let mut signed = ev.sign(&sk).unwrap();
        signed.content = "tampered".to_string();
        assert!(!signed.verify());
    }

    #[test]
    fn foreign_signature_fails_verification() {
        let (sk1, ev) = unsigned(1);
        let (sk2, _) = unsigned(2);
        let honest = ev.clone().sign(&sk1).unwrap();
        let forged = Event {
            sig: ev.sign(&sk2).unwrap().sig,
            ..honest
        };
        assert!(!forged.verify());
    }

    #[test]
    fn wire_serde_roundtrip() {
        let (sk, ev) = unsigned(1);
        let signed = ev.sign(&sk).unwrap();
        let json = serde_json::to_string(&signed).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, signed);
        assert!(back.verify());
    }

    #[test]
    fn wire_fields_are_hex_strings() {
        let (sk, ev) = unsigned(1);
        let signed = ev.sign(&sk).unwrap();
        let value: serde_json::Value = serde_json::to_value(&signed).unwrap();
        assert!(value["id"].is_string());
        assert!(value["pubkey"].is_string());
        assert!(value["sig"].is_string());
        assert!(value["created_at"].is_u64());
        assert_eq!(value["id"].as_str().unwrap().len(), 64);
        assert_eq!(value["sig"].as_str().unwrap().len(), 128);
    }

    #[test]
    fn tag_value_finds_first_match() {
        let (sk, mut ev) = unsigned(1);
        ev.tags = vec![
            Tag::new(["d", "first"]),
            Tag::new(["d", "second"]),
            Tag::new(["e"]),
        ];
        let signed = ev.sign(&sk).unwrap();
        assert_eq!(signed.tag_value("d"), Some("first"));
        assert_eq!(signed.tag_value("e"), None);
        assert_eq!(signed.tag_value("p"), None);
    }
}
