//! Top-level facade crate for chorus.
//!
//! Re-exports the codec/error crate and the gateway library so users can depend on a single crate.

pub mod core {
    pub use chorus_core::*;
}

pub mod gateway {
    pub use chorus_gateway::*;
}
