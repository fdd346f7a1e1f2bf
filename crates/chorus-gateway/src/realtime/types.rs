use axum::extract::ws::Message;

use chorus_core::error::Result;
use chorus_core::protocol::outbound::{encode, Outbound};

/// Encoded payload cached for broadcasting (serialize once, send N times).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedMsg {
    kind: &'static str,
    text: String,
}

impl PreparedMsg {
    pub fn prepare(out: &Outbound) -> Result<Self> {
        Ok(Self {
            kind: out.kind(),
            text: encode(out)?,
        })
    }

    /// Outbound `type` tag, for logs.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Convert to axum::ws::Message for transport.
    pub fn to_ws_message(&self) -> Message {
        Message::Text(self.text.clone())
    }
}
