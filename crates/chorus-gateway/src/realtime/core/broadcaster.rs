use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc::error::TrySendError;

use crate::realtime::core::{ConnId, Connection, RegistryGuard};
use crate::realtime::types::PreparedMsg;

/// Broadcaster: egress to one connection or to every logged-in connection.
///
/// Delivery is best effort. Each send is a non-blocking enqueue on the
/// connection's outbound queue; a full queue or a closed socket drops the
/// payload for that connection only and the fan-out continues.
#[derive(Default)]
pub struct Broadcaster {
    sent: AtomicU64,
    dropped: AtomicU64,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the payload was enqueued.
    pub fn send_to(&self, conn: &Connection, msg: &PreparedMsg) -> bool {
        match conn.try_send(msg.to_ws_message()) {
            Ok(()) => {
                self.sent.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(e) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                let reason = match e {
                    TrySendError::Full(_) => "queue full",
                    TrySendError::Closed(_) => "connection closed",
                };
                tracing::debug!(conn = conn.id(), kind = msg.kind(), reason, "send dropped");
                false
            }
        }
    }

    /// Send to every logged-in connection. Returns the number enqueued.
    pub fn broadcast_all(&self, reg: &RegistryGuard<'_>, msg: &PreparedMsg) -> usize {
        let mut delivered = 0;
        reg.for_each(|conn, _| {
            if self.send_to(conn, msg) {
                delivered += 1;
            }
        });
        delivered
    }

    pub fn broadcast_all_except(
        &self,
        reg: &RegistryGuard<'_>,
        except: ConnId,
        msg: &PreparedMsg,
    ) -> usize {
        let mut delivered = 0;
        reg.for_each_except(except, |conn, _| {
            if self.send_to(conn, msg) {
                delivered += 1;
            }
        });
        delivered
    }

    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::core::{Registry, User};
    use axum::extract::ws::Message;
    use chorus_core::protocol::Outbound;
    use tokio::sync::mpsc;

    #[test]
    fn one_dead_connection_does_not_stop_the_fanout() {
        let reg = Registry::new();
        let b = Broadcaster::new();

        let (tx_a, mut rx_a) = mpsc::channel::<Message>(4);
        let (tx_dead, rx_dead) = mpsc::channel::<Message>(4);
        let (tx_c, mut rx_c) = mpsc::channel::<Message>(4);
        drop(rx_dead);

        {
            let mut g = reg.lock();
            g.insert(Connection::new(1, tx_a), User::new("a")).unwrap();
            g.insert(Connection::new(2, tx_dead), User::new("dead")).unwrap();
            g.insert(Connection::new(3, tx_c), User::new("c")).unwrap();
        }

        let msg = PreparedMsg::prepare(&Outbound::system("hello")).unwrap();
        let delivered = b.broadcast_all(&reg.lock(), &msg);

        assert_eq!(delivered, 2);
        assert_eq!(b.dropped(), 1);
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_c.try_recv().is_ok());
    }

    #[test]
    fn full_queue_drops_instead_of_blocking() {
        let b = Broadcaster::new();
        let (tx, _rx) = mpsc::channel::<Message>(1);
        let conn = Connection::new(7, tx);
        let msg = PreparedMsg::prepare(&Outbound::system("x")).unwrap();

        assert!(b.send_to(&conn, &msg));
        assert!(!b.send_to(&conn, &msg));
        assert_eq!(b.sent(), 1);
        assert_eq!(b.dropped(), 1);
    }
}
