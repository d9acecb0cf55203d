//! Badge definitions, definition coordinates, and the definition/award
//! builders.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::event::{Event, Tag, UnsignedEvent};
use crate::EventError;
use laurel_types::{PublicKey, Timestamp, KIND_BADGE_AWARD, KIND_BADGE_DEFINITION};

/// A badge template with a strict field set.
///
/// This is also the on-disk shape of a definition file; the wire tag layout
/// is produced by [`build_definition`] and recovered by
/// [`parse_definition`], never handled positionally by callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeDefinition {
    pub identifier: String,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,
}

/// Check an identifier for use in a `d` tag and a definition coordinate.
///
/// `:` is reserved as the coordinate separator; whitespace and control
/// characters cannot survive the tag encoding.
pub fn validate_identifier(identifier: &str) -> Result<(), EventError> {
    if identifier.is_empty() {
        return Err(EventError::InvalidIdentifier("identifier is empty".into()));
    }
    if identifier
        .chars()
        .any(|c| c == ':' || c.is_whitespace() || c.is_control())
    {
        return Err(EventError::InvalidIdentifier(format!(
            "{identifier:?} contains reserved characters"
        )));
    }
    Ok(())
}

/// A definition coordinate: `30009:<issuer-hex>:<identifier>`.
///
/// The stable reference awards and acceptances use; it names the definition
/// by issuer and identifier, never by mutable content.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DefinitionRef {
    pub issuer: PublicKey,
    pub identifier: String,
}

impl DefinitionRef {
    pub fn new(issuer: PublicKey, identifier: impl Into<String>) -> Result<Self, EventError> {
        let identifier = identifier.into();
        validate_identifier(&identifier)?;
        Ok(Self { issuer, identifier })
    }
}

impl fmt::Display for DefinitionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            KIND_BADGE_DEFINITION,
            self.issuer.to_hex(),
            self.identifier
        )
    }
}

impl FromStr for DefinitionRef {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let (kind, pubkey, identifier) = match (parts.next(), parts.next(), parts.next()) {
            (Some(k), Some(p), Some(i)) => (k, p, i),
            _ => {
                return Err(EventError::InvalidRef(format!(
                    "expected kind:pubkey:identifier, got {s:?}"
                )))
            }
        };
        if kind.parse::<u32>() != Ok(KIND_BADGE_DEFINITION) {
            return Err(EventError::InvalidRef(format!(
                "coordinate kind must be {KIND_BADGE_DEFINITION}, got {kind:?}"
            )));
        }
        let issuer = PublicKey::from_hex(pubkey)
            .ok_or_else(|| EventError::InvalidRef(format!("bad issuer pubkey in {s:?}")))?;
        validate_identifier(identifier)?;
        Ok(Self {
            issuer,
            identifier: identifier.to_string(),
        })
    }
}

/// Build a kind 30009 Badge Definition event.
pub fn build_definition(
    def: &BadgeDefinition,
    issuer: &PublicKey,
    created_at: Timestamp,
) -> Result<UnsignedEvent, EventError> {
    validate_identifier(&def.identifier)?;
    let mut tags = vec![
        Tag::new(["d", def.identifier.as_str()]),
        Tag::new(["name", def.name.as_str()]),
        Tag::new(["description", def.description.as_str()]),
    ];
    if let Some(image) = &def.image {
        tags.push(Tag::new(["image", image.as_str()]));
    }
    if let Some(thumb) = &def.thumb {
        tags.push(Tag::new(["thumb", thumb.as_str()]));
    }
    Ok(UnsignedEvent {
        pubkey: *issuer,
        created_at,
        kind: KIND_BADGE_DEFINITION,
        tags,
        content: format!("Badge definition: {}", def.name),
    })
}

/// Parse a kind 30009 event back into its badge definition.
pub fn parse_definition(event: &Event) -> Result<BadgeDefinition, EventError> {
    if event.kind != KIND_BADGE_DEFINITION {
        return Err(EventError::WrongKind {
            expected: KIND_BADGE_DEFINITION,
            found: event.kind,
        });
    }
    let identifier = event
        .tag_value("d")
        .ok_or_else(|| EventError::InvalidRef("definition event has no d tag".into()))?;
    validate_identifier(identifier)?;
    Ok(BadgeDefinition {
        identifier: identifier.to_string(),
        name: event.tag_value("name").unwrap_or_default().to_string(),
        description: event
            .tag_value("description")
            .unwrap_or_default()
            .to_string(),
        image: event.tag_value("image").map(str::to_string),
        thumb: event.tag_value("thumb").map(str::to_string),
    })
}

/// Build a kind 8 Badge Award event referencing one definition.
///
/// Recipients are kept in caller order and not deduplicated; awarding the
/// same badge twice to one key is the caller's choice.
pub fn build_award(
    definition: &DefinitionRef,
    recipients: &[PublicKey],
    created_at: Timestamp,
) -> Result<UnsignedEvent, EventError> {
    if recipients.is_empty() {
        return Err(EventError::NoRecipients);
    }
    let mut tags = Vec::with_capacity(recipients.len() + 1);
    tags.push(Tag::new(["a", definition.to_string().as_str()]));
    for recipient in recipients {
        tags.push(Tag::new(["p", recipient.to_hex().as_str()]));
    }
    Ok(UnsignedEvent {
        pubkey: definition.issuer,
        created_at,
        kind: KIND_BADGE_AWARD,
        tags,
        content: format!("Awarded badge: {}", definition.identifier),
    })
}
