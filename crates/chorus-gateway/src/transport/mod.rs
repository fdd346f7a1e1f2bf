//! Transport layer (WebSocket).
//!
//! Exposes the WS upgrade handler and the frame classifier that sits in
//! front of the dispatcher.

pub mod codec;
pub mod ws;
