//! Value objects describing one guild's voice presence.
//!
//! A `GuildPresence` is a full snapshot, never a diff: the bot recomputes the
//! complete channel listing for the affected guild on every voice state change
//! and each accepted update replaces the previous one wholesale.

use std::collections::HashMap;
use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Opaque stable identifier for a guild.
///
/// Whatever string the producer sends; never parsed or validated beyond
/// being non-empty at ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuildId(String);

impl GuildId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for GuildId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Epoch-millisecond point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// Creates a timestamp from raw epoch milliseconds.
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the raw epoch milliseconds.
    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

/// One member currently present in a voice channel.
///
/// An immutable identity snapshot taken at update time; if the member renames
/// themselves the next full update carries the new name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceMember {
    pub id: String,
    pub username: String,
    pub tag: String,
}

/// Full voice presence for one guild: every occupied channel and its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildPresence {
    pub guild_id: GuildId,

    /// Display name; best-effort, empty when the producer omitted it.
    pub guild_name: String,

    /// Channel name -> members currently in it. Channels with no members are
    /// simply absent.
    pub channels: HashMap<String, Vec<VoiceMember>>,

    /// When the relay accepted this snapshot (epoch milliseconds).
    pub updated: Timestamp,
}

impl GuildPresence {
    /// Builds a snapshot stamped with the current time.
    pub fn new(
        guild_id: GuildId,
        guild_name: String,
        channels: HashMap<String, Vec<VoiceMember>>,
    ) -> Self {
        Self {
            guild_id,
            guild_name,
            channels,
            updated: Timestamp::now(),
        }
    }
}
