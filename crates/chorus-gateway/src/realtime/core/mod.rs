//! Realtime core components for the gateway runtime.
//!
//! Connection registry, broadcaster, and the per-event context shared
//! across services.

mod broadcaster;
mod ctx;
mod registry;

pub use broadcaster::Broadcaster;
pub use ctx::RealtimeCtx;
pub use registry::{ConnId, Connection, NowPlaying, Registry, RegistryGuard, User};
