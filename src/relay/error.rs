//! Error types for the relay core.

use thiserror::Error;

/// Errors surfaced to the producer on update submission.
///
/// Delivery failures to individual subscribers are deliberately absent here:
/// they are isolated to the failing subscription (which gets detached) and
/// never propagate to the producer or to other subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// A shared secret is configured and the presented credential does not
    /// match it exactly.
    #[error("credential does not match the configured tracker secret")]
    Unauthorized,

    /// The submission carried no guild id, so there is nothing to key the
    /// snapshot on.
    #[error("update submission is missing a guild id")]
    MissingGuildId,
}
