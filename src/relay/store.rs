//! In-memory snapshot store: the latest known presence per guild.
//!
//! Entries are replaced wholesale on each accepted update and are never
//! deleted; the store lives for the process lifetime. The store has no
//! locking of its own — it is owned exclusively by the [`Relay`] and only
//! touched under the relay's lock.
//!
//! [`Relay`]: super::Relay

use std::collections::HashMap;

use crate::domain::{GuildId, GuildPresence};

/// Latest snapshot per guild.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    entries: HashMap<GuildId, GuildPresence>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any existing entry for the guild with `presence` entirely.
    pub fn put(&mut self, presence: GuildPresence) {
        self.entries.insert(presence.guild_id.clone(), presence);
    }

    /// Clone of the full mapping, for one-shot reads and attach replay.
    ///
    /// Callers must not assume any ordering.
    pub fn snapshot(&self) -> HashMap<GuildId, GuildPresence> {
        self.entries.clone()
    }

    /// Latest snapshot for one guild, if any update was ever accepted for it.
    pub fn get(&self, guild_id: &GuildId) -> Option<&GuildPresence> {
        self.entries.get(guild_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
