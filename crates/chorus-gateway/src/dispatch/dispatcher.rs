use std::sync::Arc;

use chorus_core::error::Result;
use chorus_core::protocol::inbound::{decode, Inbound};

use crate::compat::CompatibilityEstimator;
use crate::config::ChatSection;
use crate::realtime::{Broadcaster, ConnId, Connection, RealtimeCtx, Registry};
use crate::services::{ChatService, MusicService, PresenceService};

/// Routes connection lifecycle and decoded events to services.
///
/// Per-connection state machine: Anonymous (open, no user) -> Active
/// (registered user) -> Closed. Every entry point takes the registry lock
/// once and runs mutation plus fan-out to completion before releasing it.
/// Errors stay with the connection that caused them: they are logged and
/// never sent to clients.
pub struct Dispatcher {
    registry: Arc<Registry>,
    broadcaster: Arc<Broadcaster>,
    presence: PresenceService,
    chat: ChatService,
    music: MusicService,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<Registry>,
        broadcaster: Arc<Broadcaster>,
        estimator: Arc<dyn CompatibilityEstimator>,
        settings: ChatSection,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            presence: PresenceService::new(settings),
            chat: ChatService::new(),
            music: MusicService::new(estimator),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn broadcaster(&self) -> &Arc<Broadcaster> {
        &self.broadcaster
    }

    /// New socket: Anonymous until it logs in.
    pub fn on_open(&self, conn: &Connection) {
        self.registry.lock().mark_open(conn.id());
        tracing::debug!(conn = conn.id(), "connection opened");
    }

    /// One raw text frame from the transport.
    pub fn on_message(&self, conn: &Connection, raw: &str) {
        self.dispatch(conn, decode(raw));
    }

    pub fn dispatch(&self, conn: &Connection, event: Inbound) {
        let kind = event.kind();
        if let Err(e) = self.route(conn, event) {
            tracing::debug!(
                conn = conn.id(),
                kind,
                code = e.code().as_str(),
                error = %e,
                "event not applied"
            );
        }
    }

    fn route(&self, conn: &Connection, event: Inbound) -> Result<()> {
        if let Inbound::Unknown { reason } = &event {
            tracing::debug!(conn = conn.id(), %reason, "dropped unknown envelope");
            return Ok(());
        }

        let mut ctx = RealtimeCtx::new(conn, self.registry.lock(), &self.broadcaster);

        if let Inbound::Login { username } = event {
            return self.presence.login(&mut ctx, username);
        }

        if ctx.sender().is_none() {
            tracing::debug!(conn = conn.id(), kind = event.kind(), "ignored: not logged in");
            return Ok(());
        }

        match event {
            Inbound::ChatMessage { content } => self.chat.message(&mut ctx, content),
            Inbound::NowPlaying { song, artist } => self.music.now_playing(&mut ctx, song, artist),
            Inbound::ShareSong { url, song, artist } => {
                self.music.share_song(&mut ctx, url, song, artist)
            }
            Inbound::MusicProfile { top_artists } => self.music.music_profile(&mut ctx, top_artists),
            Inbound::Login { .. } | Inbound::Unknown { .. } => Ok(()),
        }
    }

    /// Socket gone. Idempotent: a repeated or late close is a no-op.
    pub fn on_close(&self, id: ConnId) {
        let mut reg = self.registry.lock();
        reg.mark_closed(id);
        if let Err(e) = self.presence.leave(&mut reg, &self.broadcaster, id) {
            tracing::warn!(conn = id, code = e.code().as_str(), error = %e, "leave broadcast failed");
        }
        tracing::debug!(conn = id, "connection closed");
    }
}
