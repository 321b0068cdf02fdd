//! Broadcast relay: the single owner of presence state and its observers.
//!
//! The relay accepts authenticated full-state updates from the tracker bot,
//! stores the latest snapshot per guild, and fans each accepted update out to
//! every live subscription. Store mutation and fan-out happen as one atomic
//! unit under the relay's write lock, so all subscribers observe updates in
//! acceptance order and a subscription attached mid-update either sees the
//! update in its replay or receives it afterwards as its own frame — never
//! both, never neither.
//!
//! Delivery is fire-and-forget: at most once per subscriber, last snapshot
//! wins. A subscriber that cannot keep up overflows its bounded buffer and is
//! detached instead of back-pressuring the producer.

mod error;
mod events;
mod store;
mod subscriptions;

pub use error::RelayError;
pub use events::ChangeEvent;
pub use store::SnapshotStore;
pub use subscriptions::{SubscriberId, Subscription, SubscriptionRegistry};

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::RwLock;

use crate::config::TrackerConfig;
use crate::domain::{GuildId, GuildPresence, VoiceMember};

/// One update as submitted by the producer, before validation.
#[derive(Debug, Clone, Default)]
pub struct UpdateSubmission {
    pub guild_id: Option<String>,
    pub guild_name: Option<String>,
    pub channels: Option<HashMap<String, Vec<VoiceMember>>>,
}

/// State behind the relay's lock. Nothing outside this module can reach the
/// store or the registry except through the relay's operations.
struct RelayInner {
    store: SnapshotStore,
    registry: SubscriptionRegistry,
}

/// The broadcast relay. Cheap to share via `Arc`.
pub struct Relay {
    secret: Option<String>,
    subscription_buffer: usize,
    inner: RwLock<RelayInner>,
}

impl Relay {
    /// Creates a relay with an empty store and no subscribers.
    ///
    /// When `secret` is `None` every update is accepted unauthenticated; the
    /// caller is expected to have made that deployment decision consciously.
    pub fn new(secret: Option<String>, subscription_buffer: usize) -> Self {
        Self {
            secret,
            // A fresh subscription must always have room for its init replay.
            subscription_buffer: subscription_buffer.max(1),
            inner: RwLock::new(RelayInner {
                store: SnapshotStore::new(),
                registry: SubscriptionRegistry::new(),
            }),
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.secret.clone(), config.subscription_buffer)
    }

    /// Validates and applies one update, then fans it out to all subscribers.
    ///
    /// A rejected update touches neither the store nor any subscription.
    ///
    /// # Errors
    ///
    /// - [`RelayError::Unauthorized`] when a secret is configured and the
    ///   credential does not match it exactly.
    /// - [`RelayError::MissingGuildId`] when the submission has no guild id.
    pub async fn submit_update(
        &self,
        credential: Option<&str>,
        submission: UpdateSubmission,
    ) -> Result<(), RelayError> {
        if let Some(secret) = &self.secret {
            if credential != Some(secret.as_str()) {
                return Err(RelayError::Unauthorized);
            }
        }

        let guild_id = submission
            .guild_id
            .filter(|id| !id.is_empty())
            .ok_or(RelayError::MissingGuildId)?;

        let presence = GuildPresence::new(
            GuildId::new(guild_id),
            submission.guild_name.unwrap_or_default(),
            submission.channels.unwrap_or_default(),
        );

        // Store mutation and fan-out under one write guard: submissions are
        // serialized, and no attach can slip between the write and its frames.
        let mut inner = self.inner.write().await;
        inner.store.put(presence.clone());
        tracing::debug!(
            guild_id = %presence.guild_id,
            channels = presence.channels.len(),
            subscribers = inner.registry.len(),
            "accepted presence update"
        );
        Self::fan_out(&mut inner.registry, ChangeEvent::VcUpdate(presence));
        Ok(())
    }

    /// Full store snapshot for one-shot consumers. No side effects.
    pub async fn read_all(&self) -> HashMap<GuildId, GuildPresence> {
        self.inner.read().await.store.snapshot()
    }

    /// Attaches a new subscription.
    ///
    /// The returned receiver's first event is always [`ChangeEvent::Init`]
    /// with the store as of attach time, followed by every update accepted
    /// after that point, in acceptance order.
    pub async fn attach(&self) -> (SubscriberId, mpsc::Receiver<ChangeEvent>) {
        let (tx, rx) = mpsc::channel(self.subscription_buffer);
        let id = SubscriberId::new();

        let mut inner = self.inner.write().await;
        let replay = ChangeEvent::Init(inner.store.snapshot());
        // Cannot fail: the channel is fresh and its capacity is at least 1.
        let _ = tx.try_send(replay);
        inner.registry.insert(id, tx);
        tracing::debug!(subscriber = %id, total = inner.registry.len(), "subscriber attached");
        (id, rx)
    }

    /// Detaches a subscription. Idempotent; detaching an unknown handle is a
    /// no-op.
    pub async fn detach(&self, id: SubscriberId) {
        let mut inner = self.inner.write().await;
        if inner.registry.remove(&id) {
            tracing::debug!(subscriber = %id, total = inner.registry.len(), "subscriber detached");
        }
    }

    /// Number of live subscriptions.
    pub async fn subscriber_count(&self) -> usize {
        self.inner.read().await.registry.len()
    }

    /// Delivers `event` to every registered subscription.
    ///
    /// Non-blocking per subscriber: a full buffer means the observer has
    /// stalled, a closed channel means it is gone; either way the
    /// subscription is removed after the sweep and nobody else is affected.
    fn fan_out(registry: &mut SubscriptionRegistry, event: ChangeEvent) {
        let mut dead = Vec::new();
        for (id, subscription) in registry.iter() {
            match subscription.sender.try_send(event.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    tracing::info!(
                        subscriber = %id,
                        attached_at = subscription.attached_at.as_millis(),
                        "subscriber stalled, dropping it"
                    );
                    dead.push(*id);
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(subscriber = %id, "subscriber gone, removing");
                    dead.push(*id);
                }
            }
        }
        for id in dead {
            registry.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(guild_id: &str, channel: &str, member: &str) -> UpdateSubmission {
        let mut channels = HashMap::new();
        channels.insert(
            channel.to_string(),
            vec![VoiceMember {
                id: member.to_string(),
                username: member.to_string(),
                tag: format!("{member}#1"),
            }],
        );
        UpdateSubmission {
            guild_id: Some(guild_id.to_string()),
            guild_name: Some(format!("guild-{guild_id}")),
            channels: Some(channels),
        }
    }

    #[tokio::test]
    async fn accepted_update_is_readable() {
        let relay = Relay::new(None, 64);
        relay
            .submit_update(None, submission("g1", "Lounge", "alice"))
            .await
            .unwrap();

        let all = relay.read_all().await;
        assert_eq!(all.len(), 1);
        let entry = &all[&GuildId::new("g1")];
        assert_eq!(entry.guild_name, "guild-g1");
        assert!(entry.channels.contains_key("Lounge"));
    }

    #[tokio::test]
    async fn wrong_credential_is_rejected_and_store_untouched() {
        let relay = Relay::new(Some("hunter2".to_string()), 64);
        let err = relay
            .submit_update(Some("wrong"), submission("g1", "Lounge", "alice"))
            .await
            .unwrap_err();
        assert_eq!(err, RelayError::Unauthorized);
        assert!(relay.read_all().await.is_empty());

        // Missing credential is just as wrong as a mismatched one.
        let err = relay
            .submit_update(None, submission("g1", "Lounge", "alice"))
            .await
            .unwrap_err();
        assert_eq!(err, RelayError::Unauthorized);
    }

    #[tokio::test]
    async fn no_secret_configured_accepts_anything() {
        let relay = Relay::new(None, 64);
        relay
            .submit_update(Some("whatever"), submission("g1", "Lounge", "alice"))
            .await
            .unwrap();
        relay
            .submit_update(None, submission("g2", "Lounge", "bob"))
            .await
            .unwrap();
        assert_eq!(relay.read_all().await.len(), 2);
    }

    #[tokio::test]
    async fn missing_guild_id_is_rejected_without_fanout() {
        let relay = Relay::new(None, 64);
        let (_id, mut rx) = relay.attach().await;
        // Drain the init frame.
        assert!(matches!(rx.recv().await, Some(ChangeEvent::Init(_))));

        let err = relay
            .submit_update(None, UpdateSubmission::default())
            .await
            .unwrap_err();
        assert_eq!(err, RelayError::MissingGuildId);
        assert!(relay.read_all().await.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn rejected_credential_produces_no_frames() {
        let relay = Relay::new(Some("s".to_string()), 64);
        let (_id, mut rx) = relay.attach().await;
        assert!(matches!(rx.recv().await, Some(ChangeEvent::Init(_))));

        let _ = relay
            .submit_update(Some("nope"), submission("g1", "Lounge", "alice"))
            .await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn first_frame_is_init_with_store_at_attach_time() {
        let relay = Relay::new(None, 64);
        relay
            .submit_update(None, submission("g1", "Lounge", "alice"))
            .await
            .unwrap();

        let (_id, mut rx) = relay.attach().await;
        match rx.recv().await {
            Some(ChangeEvent::Init(map)) => {
                assert_eq!(map.len(), 1);
                assert!(map.contains_key(&GuildId::new("g1")));
            }
            other => panic!("expected init frame, got {other:?}"),
        }

        // An update after attach arrives as its own frame.
        relay
            .submit_update(None, submission("g2", "Gaming", "bob"))
            .await
            .unwrap();
        match rx.recv().await {
            Some(ChangeEvent::VcUpdate(p)) => assert_eq!(p.guild_id, GuildId::new("g2")),
            other => panic!("expected vc-update frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_store_replays_empty_init() {
        let relay = Relay::new(None, 64);
        let (_id, mut rx) = relay.attach().await;
        match rx.recv().await {
            Some(ChangeEvent::Init(map)) => assert!(map.is_empty()),
            other => panic!("expected init frame, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn all_subscribers_see_updates_in_acceptance_order() {
        let relay = Relay::new(None, 64);
        let (_a, mut rx_a) = relay.attach().await;
        let (_b, mut rx_b) = relay.attach().await;

        relay
            .submit_update(None, submission("g1", "Lounge", "alice"))
            .await
            .unwrap();
        relay
            .submit_update(None, submission("g1", "Gaming", "bob"))
            .await
            .unwrap();

        for rx in [&mut rx_a, &mut rx_b] {
            assert!(matches!(rx.recv().await, Some(ChangeEvent::Init(_))));
            match rx.recv().await {
                Some(ChangeEvent::VcUpdate(p)) => {
                    assert!(p.channels.contains_key("Lounge"))
                }
                other => panic!("expected first update, got {other:?}"),
            }
            match rx.recv().await {
                Some(ChangeEvent::VcUpdate(p)) => {
                    assert!(p.channels.contains_key("Gaming"))
                }
                other => panic!("expected second update, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn detach_is_idempotent_and_stops_delivery() {
        let relay = Relay::new(None, 64);
        let (id, mut rx) = relay.attach().await;
        assert_eq!(relay.subscriber_count().await, 1);

        relay.detach(id).await;
        relay.detach(id).await;
        assert_eq!(relay.subscriber_count().await, 0);

        relay
            .submit_update(None, submission("g1", "Lounge", "alice"))
            .await
            .unwrap();
        // Init frame was already buffered before detach; nothing after it.
        assert!(matches!(rx.recv().await, Some(ChangeEvent::Init(_))));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn stalled_subscriber_is_dropped_without_affecting_others() {
        // Buffer of 1: the init frame fills it, so the first update overflows.
        let relay = Relay::new(None, 1);
        let (_slow, _rx_slow) = relay.attach().await;

        let (_fast, mut rx_fast) = relay.attach().await;
        // Drain the fast subscriber's init so it has room.
        assert!(matches!(rx_fast.recv().await, Some(ChangeEvent::Init(_))));

        relay
            .submit_update(None, submission("g1", "Lounge", "alice"))
            .await
            .unwrap();

        // Slow subscriber got dropped, fast one got the frame.
        assert_eq!(relay.subscriber_count().await, 1);
        assert!(matches!(rx_fast.recv().await, Some(ChangeEvent::VcUpdate(_))));
    }

    #[tokio::test]
    async fn closed_receiver_is_reaped_on_next_fanout() {
        let relay = Relay::new(None, 64);
        let (_id, rx) = relay.attach().await;
        drop(rx);
        assert_eq!(relay.subscriber_count().await, 1);

        relay
            .submit_update(None, submission("g1", "Lounge", "alice"))
            .await
            .unwrap();
        assert_eq!(relay.subscriber_count().await, 0);
    }
}
