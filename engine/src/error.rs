use std::path::PathBuf;

use thiserror::Error;

use laurel_crypto::KeyError;
use laurel_events::EventError;
use laurel_relay::RelayError;

/// The pipeline stage a lifecycle failure is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Merge,
    Build,
    Sign,
    Publish,
}

/// Errors from lifecycle operations.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no relays configured")]
    NoRelays,

    #[error("no badge definitions found in {}", dir.display())]
    NoDefinitions { dir: PathBuf },

    #[error("config error: {0}")]
    Config(String),

    #[error("the award must be signed by the definition issuer")]
    IssuerMismatch,

    #[error("fetching the current profile badges failed: {0}")]
    Fetch(String),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

impl EngineError {
    /// Which pipeline stage this failure belongs to, for reporting.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Fetch(_) => Stage::Fetch,
            Self::Event(EventError::CorruptAggregate { .. }) => Stage::Merge,
            Self::Event(EventError::Key(_)) | Self::Key(_) => Stage::Sign,
            Self::Relay(_) | Self::NoRelays => Stage::Publish,
            _ => Stage::Build,
        }
    }
}
