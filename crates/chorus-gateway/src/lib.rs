//! chorus gateway library entry.
//!
//! This crate wires the transport, dispatcher, realtime core (registry and
//! broadcaster), compatibility scoring, and built-in services into the chat
//! hub. It is consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod compat;
pub mod config;
pub mod ops;
pub mod router;
pub mod transport;
pub mod dispatch;
pub mod realtime;
pub mod services;
