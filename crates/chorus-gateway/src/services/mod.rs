//! Built-in event services.
//!
//! - `presence`: login and leave
//! - `chat`: chat messages
//! - `music`: now playing, shared songs, compatibility

pub mod chat;
pub mod music;
pub mod presence;

pub use chat::ChatService;
pub use music::MusicService;
pub use presence::PresenceService;
