//! HTTP DTOs for the relay endpoints.
//!
//! These types decouple the wire format from the relay's types. Field names
//! are camelCase on the wire to match what the bot already sends.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::VoiceMember;
use crate::relay::UpdateSubmission;

/// Body of `POST /api/update-vc`.
///
/// `guild_id` is optional here so its absence surfaces as the relay's own
/// missing-guild-id rejection (a 400 with an empty body) rather than a
/// deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVcRequest {
    pub guild_id: Option<String>,
    pub guild_name: Option<String>,
    pub channels: Option<HashMap<String, Vec<VoiceMember>>>,
}

impl From<UpdateVcRequest> for UpdateSubmission {
    fn from(req: UpdateVcRequest) -> Self {
        Self {
            guild_id: req.guild_id,
            guild_name: req.guild_name,
            channels: req.channels,
        }
    }
}

/// Acknowledgement for an accepted update.
#[derive(Debug, Clone, Serialize)]
pub struct AckResponse {
    pub ok: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

/// Error body for rejected requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn unauthorized() -> Self {
        Self {
            error: "unauthorized".to_string(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub subscribers: usize,
    pub guilds: usize,
}
