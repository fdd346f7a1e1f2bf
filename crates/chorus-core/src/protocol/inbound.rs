//! Inbound envelopes (client -> server).
//!
//! Every payload is a JSON object whose `type` field selects the event kind.
//! Fields the event does not use (the web client attaches `user`, `channel`
//! and `timestamp` to chat messages) are ignored.

use serde::Deserialize;
use serde_json::Value;

/// Decoded client event. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum Inbound {
    /// Claim a display name. `join`/`user` is what the bundled web client sends.
    #[serde(rename = "login", alias = "join")]
    Login {
        #[serde(alias = "user")]
        username: String,
    },
    /// Chat text; may be empty.
    #[serde(rename = "message")]
    ChatMessage { content: String },
    #[serde(rename = "now_playing")]
    NowPlaying { song: String, artist: String },
    #[serde(rename = "share_song")]
    ShareSong {
        url: String,
        song: String,
        artist: String,
    },
    /// Request a compatibility map. Optionally carries the sender's top artists.
    #[serde(rename = "music_profile")]
    MusicProfile {
        #[serde(default)]
        top_artists: Option<Vec<String>>,
    },
    /// Anything unrecognized or structurally incomplete.
    #[serde(skip_deserializing)]
    Unknown { reason: String },
}

impl Inbound {
    /// Short kind label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Inbound::Login { .. } => "login",
            Inbound::ChatMessage { .. } => "chat_message",
            Inbound::NowPlaying { .. } => "now_playing",
            Inbound::ShareSong { .. } => "share_song",
            Inbound::MusicProfile { .. } => "music_profile",
            Inbound::Unknown { .. } => "unknown",
        }
    }

    fn unknown(reason: impl Into<String>) -> Self {
        Inbound::Unknown {
            reason: reason.into(),
        }
    }
}

/// Decode one text frame. Total: never fails, never panics.
///
/// Only a JSON object qualifies as an envelope; serde would otherwise accept
/// a sequence whose first element is the tag.
pub fn decode(raw: &str) -> Inbound {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => return Inbound::unknown(format!("invalid envelope: {e}")),
    };
    if !value.is_object() {
        return Inbound::unknown("envelope must be a JSON object");
    }

    match Inbound::deserialize(value) {
        Ok(Inbound::Login { username }) if username.trim().is_empty() => {
            Inbound::unknown("login requires a non-blank username")
        }
        Ok(ev) => ev,
        Err(e) => Inbound::unknown(format!("invalid envelope: {e}")),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn join_alias_from_web_client() {
        let ev = decode(r#"{"type":"join","user":"alice"}"#);
        assert_eq!(
            ev,
            Inbound::Login {
                username: "alice".into()
            }
        );
    }

    #[test]
    fn chat_ignores_client_side_extras() {
        let ev = decode(
            r#"{"type":"message","user":"mallory","content":"hey","channel":"general","timestamp":"2025-09-15T10:00:00Z"}"#,
        );
        assert_eq!(
            ev,
            Inbound::ChatMessage {
                content: "hey".into()
            }
        );
    }

    #[test]
    fn arrays_are_not_envelopes() {
        for raw in [
            r#"["login","alice"]"#,
            r#"["message","hi"]"#,
            r#"["share_song","u","s","a"]"#,
        ] {
            match decode(raw) {
                Inbound::Unknown { reason } => {
                    assert_eq!(reason, "envelope must be a JSON object", "input={raw}")
                }
                other => panic!("{raw} decoded to {other:?}"),
            }
        }
    }

    #[test]
    fn blank_username_is_incomplete() {
        assert_eq!(decode(r#"{"type":"login","username":"   "}"#).kind(), "unknown");
        assert_eq!(decode(r#"{"type":"join","user":"\t"}"#).kind(), "unknown");
    }

    #[test]
    fn unknown_never_comes_from_the_wire() {
        let ev = decode(r#"{"type":"Unknown","reason":"x"}"#);
        assert_eq!(ev.kind(), "unknown");
        match ev {
            Inbound::Unknown { reason } => assert!(reason.starts_with("invalid envelope")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
