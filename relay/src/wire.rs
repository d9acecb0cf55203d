//! NIP-01 client and relay wire frames.
//!
//! Frames are JSON arrays: `["EVENT", …]`, `["REQ", …]`, `["CLOSE", …]`
//! client-side; `["OK", …]`, `["NOTICE", …]`, `["EVENT", …]`, `["EOSE", …]`,
//! `["CLOSED", …]` relay-side.

use serde::Serialize;
use serde_json::{json, Value};

use laurel_events::Event;
use laurel_types::{EventId, PublicKey};

/// A subscription filter — the subset of fields this tool queries with.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Filter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<PublicKey>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<EventId>>,
    #[serde(rename = "#d", skip_serializing_if = "Option::is_none")]
    pub d_tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(mut self, kinds: impl IntoIterator<Item = u32>) -> Self {
        self.kinds = Some(kinds.into_iter().collect());
        self
    }

    pub fn author(mut self, author: PublicKey) -> Self {
        self.authors.get_or_insert_with(Vec::new).push(author);
        self
    }

    pub fn id(mut self, id: EventId) -> Self {
        self.ids.get_or_insert_with(Vec::new).push(id);
        self
    }

    pub fn d_tag(mut self, value: impl Into<String>) -> Self {
        self.d_tags.get_or_insert_with(Vec::new).push(value.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Frames a client sends to a relay.
#[derive(Clone, Debug)]
pub enum ClientMessage {
    /// `["EVENT", <event>]`
    Publish(Event),
    /// `["REQ", <sub id>, <filter>]`
    Subscribe { id: String, filter: Filter },
    /// `["CLOSE", <sub id>]`
    Close { id: String },
}

impl ClientMessage {
    pub fn to_json(&self) -> String {
        match self {
            Self::Publish(event) => json!(["EVENT", event]).to_string(),
            Self::Subscribe { id, filter } => json!(["REQ", id, filter]).to_string(),
            Self::Close { id } => json!(["CLOSE", id]).to_string(),
        }
    }
}

/// Frames a relay sends back.
#[derive(Clone, Debug)]
pub enum RelayMessage {
    /// `["OK", <event id>, <accepted>, <message>]`
    Ok {
        event_id: String,
        accepted: bool,
        message: String,
    },
    /// `["NOTICE", <message>]`
    Notice(String),
    /// `["EVENT", <sub id>, <event>]`
    Event { subscription: String, event: Event },
    /// `["EOSE", <sub id>]`
    Eose(String),
    /// `["CLOSED", <sub id>, <message>]`
    Closed {
        subscription: String,
        message: String,
    },
}

impl RelayMessage {
    /// Parse a raw relay frame. Tolerant: anything unrecognized or
    /// malformed is `None` rather than an error — relays send all sorts.
    pub fn parse(raw: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(raw).ok()?;
        let arr = value.as_array()?;
        match arr.first()?.as_str()? {
            "OK" if arr.len() >= 4 => Some(Self::Ok {
                event_id: arr[1].as_str()?.to_string(),
                accepted: arr[2].as_bool()?,
                message: arr[3].as_str().unwrap_or_default().to_string(),
            }),
            "NOTICE" if arr.len() >= 2 => Some(Self::Notice(arr[1].as_str()?.to_string())),
            "EVENT" if arr.len() >= 3 => Some(Self::Event {
                subscription: arr[1].as_str()?.to_string(),
                event: serde_json::from_value(arr[2].clone()).ok()?,
            }),
            "EOSE" if arr.len() >= 2 => Some(Self::Eose(arr[1].as_str()?.to_string())),
            "CLOSED" if arr.len() >= 3 => Some(Self::Closed {
                subscription: arr[1].as_str()?.to_string(),
                message: arr[2].as_str().unwrap_or_default().to_string(),
            }),
            _ => None,
        }
    }
}
