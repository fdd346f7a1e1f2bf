use std::net::SocketAddr;

use serde::Deserialize;
use chorus_core::error::{ChorusError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub chat: ChatSection,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            version: 1,
            gateway: GatewaySection::default(),
            chat: ChatSection::default(),
        }
    }
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ChorusError::UnsupportedVersion);
        }

        self.gateway.validate()?;
        self.chat.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,

    #[serde(default = "default_idle_timeout_ms")]
    pub idle_timeout_ms: u64,

    /// Per-connection outbound queue capacity.
    #[serde(default = "default_outbound_queue")]
    pub outbound_queue: usize,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            ping_interval_ms: default_ping_interval_ms(),
            idle_timeout_ms: default_idle_timeout_ms(),
            outbound_queue: default_outbound_queue(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;
        if !(5000..=120000).contains(&self.ping_interval_ms) {
            return Err(ChorusError::BadRequest(
                "gateway.ping_interval_ms must be between 5000 and 120000".into(),
            ));
        }
        if !(10000..=600000).contains(&self.idle_timeout_ms) {
            return Err(ChorusError::BadRequest(
                "gateway.idle_timeout_ms must be between 10000 and 600000".into(),
            ));
        }
        if self.idle_timeout_ms <= self.ping_interval_ms {
            return Err(ChorusError::BadRequest(
                "gateway.idle_timeout_ms must be greater than ping_interval_ms".into(),
            ));
        }
        if !(1..=65536).contains(&self.outbound_queue) {
            return Err(ChorusError::BadRequest(
                "gateway.outbound_queue must be between 1 and 65536".into(),
            ));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            ChorusError::BadRequest(format!("gateway.listen is not a socket address ({}): {e}", self.listen))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".into()
}
fn default_ping_interval_ms() -> u64 {
    20000
}
fn default_idle_timeout_ms() -> u64 {
    60000
}
fn default_outbound_queue() -> usize {
    256
}

/// What happens when a login claims a name another session already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamePolicy {
    /// Refuse; the connection stays anonymous and may retry.
    #[default]
    Reject,
    /// Append `-2`, `-3`, ... until unique, shortening the name to stay
    /// within `max_username_chars`.
    Rename,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatSection {
    /// `{user}` is replaced by the display name.
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    #[serde(default = "default_max_frame_bytes")]
    pub max_frame_bytes: usize,

    #[serde(default = "default_max_username_chars")]
    pub max_username_chars: usize,

    #[serde(default)]
    pub name_policy: NamePolicy,
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            welcome_message: default_welcome_message(),
            max_frame_bytes: default_max_frame_bytes(),
            max_username_chars: default_max_username_chars(),
            name_policy: NamePolicy::default(),
        }
    }
}

impl ChatSection {
    pub fn validate(&self) -> Result<()> {
        if !(64..=1_048_576).contains(&self.max_frame_bytes) {
            return Err(ChorusError::BadRequest(
                "chat.max_frame_bytes must be between 64 and 1048576".into(),
            ));
        }
        if !(1..=256).contains(&self.max_username_chars) {
            return Err(ChorusError::BadRequest(
                "chat.max_username_chars must be between 1 and 256".into(),
            ));
        }
        Ok(())
    }

    pub fn welcome_for(&self, user: &str) -> String {
        self.welcome_message.replace("{user}", user)
    }
}

fn default_welcome_message() -> String {
    "Welcome, {user}!".into()
}
fn default_max_frame_bytes() -> usize {
    16384
}
fn default_max_username_chars() -> usize {
    32
}
