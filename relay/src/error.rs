use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The relay set was empty — a configuration problem, reported before
    /// any connection attempt is made.
    #[error("no relays configured")]
    NoRelays,
}
