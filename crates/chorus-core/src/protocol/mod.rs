//! Envelope codec (JSON text frames with a `type` discriminator).
//!
//! - Inbound: client -> server events, decoded into a closed set of kinds.
//! - Outbound: server -> client events, encoded with a real serializer so
//!   quotes, backslashes and control characters in user text stay escaped.
//!
//! Decoding is total: anything unrecognized or incomplete becomes
//! `Inbound::Unknown` carrying the reason, never an error or a panic.

pub mod inbound;
pub mod outbound;

pub use inbound::{decode, Inbound};
pub use outbound::{encode, Outbound};
