use chorus_core::error::Result;
use chorus_core::protocol::Outbound;

use crate::realtime::core::{Broadcaster, Connection, RegistryGuard, User};
use crate::realtime::types::PreparedMsg;

/// Per-event context passed to services.
///
/// Holds the registry guard for the whole event, so a service's mutation and
/// the broadcasts that follow it form one critical section.
pub struct RealtimeCtx<'a> {
    conn: &'a Connection,
    reg: RegistryGuard<'a>,
    broadcaster: &'a Broadcaster,
}

impl<'a> RealtimeCtx<'a> {
    pub fn new(conn: &'a Connection, reg: RegistryGuard<'a>, broadcaster: &'a Broadcaster) -> Self {
        Self {
            conn,
            reg,
            broadcaster,
        }
    }

    pub fn conn(&self) -> &Connection {
        self.conn
    }

    pub fn registry(&self) -> &RegistryGuard<'a> {
        &self.reg
    }

    pub fn registry_mut(&mut self) -> &mut RegistryGuard<'a> {
        &mut self.reg
    }

    /// The sender's user, if logged in.
    pub fn sender(&self) -> Option<&User> {
        self.reg.get(self.conn.id())
    }

    pub fn sender_mut(&mut self) -> Option<&mut User> {
        self.reg.lookup(self.conn.id())
    }

    /// Send to the originating connection only (logged in or not).
    pub fn reply(&self, out: &Outbound) -> Result<bool> {
        let msg = PreparedMsg::prepare(out)?;
        Ok(self.broadcaster.send_to(self.conn, &msg))
    }

    /// Send to every logged-in connection, sender included.
    pub fn publish_all(&self, out: &Outbound) -> Result<usize> {
        let msg = PreparedMsg::prepare(out)?;
        Ok(self.broadcaster.broadcast_all(&self.reg, &msg))
    }

    /// Send to every logged-in connection except the sender.
    pub fn publish_others(&self, out: &Outbound) -> Result<usize> {
        let msg = PreparedMsg::prepare(out)?;
        Ok(self
            .broadcaster
            .broadcast_all_except(&self.reg, self.conn.id(), &msg))
    }
}
