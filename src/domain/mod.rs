//! Domain types for voice presence tracking.

mod presence;

pub use presence::{GuildId, GuildPresence, Timestamp, VoiceMember};
