//! In-memory connections for driving the dispatcher without sockets.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::Arc;

use axum::extract::ws::Message;
use serde_json::Value;
use tokio::sync::mpsc;

use chorus_gateway::compat::CompatibilityEstimator;
use chorus_gateway::config::{ChatSection, NamePolicy};
use chorus_gateway::dispatch::Dispatcher;
use chorus_gateway::realtime::{Broadcaster, Connection, Registry, User};

/// Always returns the same score.
pub struct FixedEstimator(pub u8);

impl CompatibilityEstimator for FixedEstimator {
    fn score(&self, _a: &User, _b: &User) -> u8 {
        self.0
    }
}

pub fn dispatcher_with(estimator: Arc<dyn CompatibilityEstimator>, policy: NamePolicy) -> Dispatcher {
    let settings = ChatSection {
        name_policy: policy,
        ..ChatSection::default()
    };
    Dispatcher::new(
        Arc::new(Registry::new()),
        Arc::new(Broadcaster::new()),
        estimator,
        settings,
    )
}

pub fn dispatcher() -> Dispatcher {
    dispatcher_with(Arc::new(FixedEstimator(77)), NamePolicy::Reject)
}

pub struct Client {
    pub conn: Connection,
    rx: mpsc::Receiver<Message>,
}

impl Client {
    pub fn open(d: &Dispatcher) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let conn = Connection::new(d.registry().next_conn_id(), tx);
        d.on_open(&conn);
        Self { conn, rx }
    }

    pub fn send(&self, d: &Dispatcher, raw: &str) {
        d.on_message(&self.conn, raw);
    }

    pub fn login(d: &Dispatcher, name: &str) -> Self {
        let c = Self::open(d);
        c.send(d, &format!(r#"{{"type":"login","username":"{name}"}}"#));
        c
    }

    pub fn close(&self, d: &Dispatcher) {
        d.on_close(self.conn.id());
    }

    /// Everything queued so far, parsed.
    pub fn drain(&mut self) -> Vec<Value> {
        let mut out = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                Message::Text(s) => out.push(serde_json::from_str(&s).unwrap()),
                other => panic!("unexpected frame {other:?}"),
            }
        }
        out
    }
}
