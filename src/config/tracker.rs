//! Tracker ingestion configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Configuration for the tracker ingestion side of the relay.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Shared secret the bot must present in `x-tracker-secret`.
    ///
    /// When absent, every update is accepted unauthenticated. That matches
    /// the original deployment default and is logged at startup so the
    /// operator can decide whether it is acceptable.
    pub secret: Option<String>,

    /// Buffered events per SSE subscriber before it is considered stalled
    /// and detached.
    #[serde(default = "default_subscription_buffer")]
    pub subscription_buffer: usize,
}

impl TrackerConfig {
    /// True when updates are accepted without a credential check.
    pub fn is_open(&self) -> bool {
        self.secret.is_none()
    }

    /// Validate tracker configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.subscription_buffer == 0 {
            return Err(ValidationError::InvalidSubscriptionBuffer);
        }
        if let Some(secret) = &self.secret {
            if secret.trim().is_empty() {
                return Err(ValidationError::BlankSecret);
            }
        }
        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            secret: None,
            subscription_buffer: default_subscription_buffer(),
        }
    }
}

fn default_subscription_buffer() -> usize {
    64
}
