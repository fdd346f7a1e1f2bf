use chorus_core::error::{ChorusError, Result};
use chorus_core::protocol::Outbound;

use crate::realtime::RealtimeCtx;

#[derive(Default)]
pub struct ChatService;

impl ChatService {
    pub fn new() -> Self {
        Self
    }

    /// Full broadcast, sender included.
    pub fn message(&self, ctx: &mut RealtimeCtx<'_>, content: String) -> Result<()> {
        let user = ctx
            .sender()
            .map(|u| u.display_name().to_string())
            .ok_or_else(|| ChorusError::Internal("chat from anonymous connection".into()))?;

        let delivered = ctx.publish_all(&Outbound::Message { user, content })?;
        tracing::trace!(delivered, "chat message fanned out");
        Ok(())
    }
}
