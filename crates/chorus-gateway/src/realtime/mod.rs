//! Realtime runtime (state + egress) for the chorus gateway.

pub mod core;
pub mod types;

pub use core::{
    Broadcaster, ConnId, Connection, NowPlaying, RealtimeCtx, Registry, RegistryGuard, User,
};
pub use types::PreparedMsg;
