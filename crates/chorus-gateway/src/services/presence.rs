use chorus_core::error::{ChorusError, Result};
use chorus_core::protocol::Outbound;

use crate::config::{ChatSection, NamePolicy};
use crate::realtime::{ConnId, Broadcaster, PreparedMsg, RealtimeCtx, RegistryGuard, User};

/// Login (Anonymous -> Active) and leave (Active -> Closed).
pub struct PresenceService {
    settings: ChatSection,
}

impl PresenceService {
    pub fn new(settings: ChatSection) -> Self {
        Self { settings }
    }

    pub fn login(&self, ctx: &mut RealtimeCtx<'_>, username: String) -> Result<()> {
        if ctx.sender().is_some() {
            return Err(ChorusError::AlreadyRegistered);
        }

        if username.chars().count() > self.settings.max_username_chars {
            ctx.reply(&Outbound::system(format!(
                "Display name must be at most {} characters",
                self.settings.max_username_chars
            )))?;
            return Err(ChorusError::BadRequest("display name too long".into()));
        }

        let name = match self.settings.name_policy {
            NamePolicy::Reject => {
                if ctx.registry().name_taken(&username) {
                    ctx.reply(&Outbound::system(format!("Name '{username}' is already taken")))?;
                    return Err(ChorusError::NameTaken(username));
                }
                username
            }
            NamePolicy::Rename => {
                unique_name(ctx.registry(), username, self.settings.max_username_chars)
            }
        };

        let conn = ctx.conn().clone();
        ctx.registry_mut().insert(conn, User::new(name.clone()))?;

        ctx.reply(&Outbound::system(self.settings.welcome_for(&name)))?;
        ctx.publish_others(&Outbound::UserJoined { user: name.clone() })?;

        tracing::info!(user = %name, online = ctx.registry().len(), "user joined");
        Ok(())
    }

    /// Remove a closed connection's user and tell the rest. No-op for
    /// connections that never logged in or were already removed.
    pub fn leave(
        &self,
        reg: &mut RegistryGuard<'_>,
        broadcaster: &Broadcaster,
        id: ConnId,
    ) -> Result<()> {
        let Some(user) = reg.remove(id) else {
            return Ok(());
        };

        let msg = PreparedMsg::prepare(&Outbound::UserLeft {
            user: user.display_name().to_string(),
        })?;
        broadcaster.broadcast_all(reg, &msg);

        tracing::info!(user = %user.display_name(), online = reg.len(), "user left");
        Ok(())
    }
}

/// `base`, else `base-2`, `base-3`, ... whichever is free first. The base is
/// shortened as needed so the result stays within `max_chars`.
fn unique_name(reg: &RegistryGuard<'_>, base: String, max_chars: usize) -> String {
    if !reg.name_taken(&base) {
        return base;
    }
    let mut n = 2u64;
    loop {
        let suffix = format!("-{n}");
        let keep = max_chars.saturating_sub(suffix.len());
        let stem: String = base.chars().take(keep).collect();
        let candidate = format!("{stem}{suffix}");
        if !reg.name_taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
