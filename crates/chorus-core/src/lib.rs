//! chorus core: the envelope codec and error surface of the chat hub.
//!
//! This crate defines the JSON wire contract spoken between browser clients
//! and the gateway. It carries no transport or runtime dependencies so the
//! codec can be exercised on its own and shared with test tooling.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed input decodes to [`protocol::Inbound::Unknown`] instead of
//! failing, so hostile traffic never takes a session down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ChorusError, Result};
