//! Outbound envelopes (server -> client).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ChorusError, Result};

/// Server event. The `type` tag matches the inbound vocabulary so peers stay
/// wire-compatible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    System {
        content: String,
    },
    UserJoined {
        user: String,
    },
    UserLeft {
        user: String,
    },
    Message {
        user: String,
        content: String,
    },
    NowPlaying {
        user: String,
        song: String,
        artist: String,
    },
    SharedSong {
        user: String,
        song: String,
        artist: String,
        url: String,
    },
    CompatibilityUpdate {
        user: String,
        compatibility: BTreeMap<String, u8>,
    },
}

impl Outbound {
    pub fn system(content: impl Into<String>) -> Self {
        Outbound::System {
            content: content.into(),
        }
    }

    /// Value of the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Outbound::System { .. } => "system",
            Outbound::UserJoined { .. } => "user_joined",
            Outbound::UserLeft { .. } => "user_left",
            Outbound::Message { .. } => "message",
            Outbound::NowPlaying { .. } => "now_playing",
            Outbound::SharedSong { .. } => "shared_song",
            Outbound::CompatibilityUpdate { .. } => "compatibility_update",
        }
    }
}

/// Encode to the canonical JSON text payload.
pub fn encode(out: &Outbound) -> Result<String> {
    serde_json::to_string(out)
        .map_err(|e| ChorusError::Internal(format!("json encode failed: {e}")))
}
