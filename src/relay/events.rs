//! Change events pushed to subscribers.
//!
//! Wire shape matches what observers already parse:
//! `{"type":"init","payload":{...}}` on attach, then
//! `{"type":"vc-update","payload":{...}}` per accepted update.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{GuildId, GuildPresence};

/// One event in transit to a subscriber. Cloned per subscription; delivery is
/// always by value so subscribers never share mutable state.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum ChangeEvent {
    /// Full store replay, sent once as the first frame of every subscription.
    #[serde(rename = "init")]
    Init(HashMap<GuildId, GuildPresence>),

    /// One guild's new snapshot.
    #[serde(rename = "vc-update")]
    VcUpdate(GuildPresence),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_event_has_expected_wire_shape() {
        let event = ChangeEvent::Init(HashMap::new());
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "init");
        assert!(json["payload"].as_object().unwrap().is_empty());
    }

    #[test]
    fn update_event_has_expected_wire_shape() {
        let presence = GuildPresence::new(GuildId::new("g1"), "Server".into(), HashMap::new());
        let event = ChangeEvent::VcUpdate(presence);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "vc-update");
        assert_eq!(json["payload"]["guildId"], "g1");
    }
}
