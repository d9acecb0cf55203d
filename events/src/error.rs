use thiserror::Error;

use crate::Event;
use laurel_crypto::KeyError;

/// Errors from building, parsing, or signing badge events.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("invalid badge identifier: {0}")]
    InvalidIdentifier(String),

    #[error("an award needs at least one recipient")]
    NoRecipients,

    #[error("invalid definition coordinate: {0}")]
    InvalidRef(String),

    #[error("event kind {found} where {expected} was expected")]
    WrongKind { expected: u32, found: u32 },

    /// The aggregate's tag structure violates the paired `a`/`e` layout.
    /// Carries the offending event for diagnosis; never silently repaired.
    #[error("corrupt profile badges aggregate: {reason}")]
    CorruptAggregate { reason: String, event: Box<Event> },

    /// The builder was handed data that upstream code guarantees valid.
    /// Indicates a bug in the caller; never caught and continued.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),

    #[error(transparent)]
    Key(#[from] KeyError),
}
