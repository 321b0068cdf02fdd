//! Subscription registry: the set of live observer connections.
//!
//! Each subscriber gets its own bounded channel rather than sharing one
//! broadcast channel, because every new subscriber must receive its own
//! full-state replay strictly before any later update. The registry is a
//! plain struct owned by the [`Relay`] and only touched under its lock.
//!
//! [`Relay`]: super::Relay

use std::collections::HashMap;
use std::fmt;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::Timestamp;

use super::events::ChangeEvent;

/// Unique handle for a subscriber connection, generated server-side on attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One live subscription: its outbound channel and when it attached.
#[derive(Debug)]
pub struct Subscription {
    pub sender: mpsc::Sender<ChangeEvent>,
    pub attached_at: Timestamp,
}

/// Registry of live subscriptions, keyed by handle.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscriptions: HashMap<SubscriberId, Subscription>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber's outbound channel under a fresh handle.
    pub fn insert(&mut self, id: SubscriberId, sender: mpsc::Sender<ChangeEvent>) {
        self.subscriptions.insert(
            id,
            Subscription {
                sender,
                attached_at: Timestamp::now(),
            },
        );
    }

    /// Removes a subscription. Idempotent: removing an unknown or
    /// already-removed handle is a no-op.
    pub fn remove(&mut self, id: &SubscriberId) -> bool {
        self.subscriptions.remove(id).is_some()
    }

    /// Iterate the current subscriptions for fan-out.
    pub fn iter(&self) -> impl Iterator<Item = (&SubscriberId, &Subscription)> {
        self.subscriptions.iter()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
