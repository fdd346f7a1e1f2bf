#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::Message;
use futures_channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures_util::StreamExt;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use chorus_gateway::dispatch::Dispatcher;
use chorus_gateway::transport::ws::{run_session, SessionLimits};

mod common;
use common::{dispatcher, Client};

type Inbound = Result<Message, std::io::Error>;

struct Socket {
    to_server: UnboundedSender<Inbound>,
    from_server: UnboundedReceiver<Message>,
    task: JoinHandle<()>,
}

fn limits(idle: Duration) -> SessionLimits {
    SessionLimits {
        ping_every: Duration::from_secs(3600),
        idle_timeout: idle,
        max_frame_bytes: 128,
        outbound_queue: 16,
    }
}

fn connect(d: &Arc<Dispatcher>, limits: SessionLimits) -> Socket {
    let (to_server, server_rx) = unbounded::<Inbound>();
    let (server_tx, from_server) = unbounded::<Message>();
    let id = d.registry().next_conn_id();
    let task = tokio::spawn(run_session(Arc::clone(d), limits, id, server_tx, server_rx));
    Socket {
        to_server,
        from_server,
        task,
    }
}

impl Socket {
    fn send_text(&self, s: &str) {
        self.to_server.unbounded_send(Ok(Message::Text(s.to_string()))).unwrap();
    }

    async fn recv_json(&mut self) -> Value {
        let msg = timeout(Duration::from_secs(2), self.from_server.next())
            .await
            .expect("server reply within timeout")
            .expect("socket open");
        match msg {
            Message::Text(s) => serde_json::from_str(&s).unwrap(),
            other => panic!("unexpected frame {other:?}"),
        }
    }
}

#[tokio::test]
async fn oversized_frame_is_dropped_and_session_stays_open() {
    let d = Arc::new(dispatcher());
    let mut sock = connect(&d, limits(Duration::from_secs(60)));

    sock.send_text(r#"{"type":"login","username":"alice"}"#);
    assert_eq!(sock.recv_json().await, json!({"type":"system","content":"Welcome, alice!"}));

    let big = format!(r#"{{"type":"message","content":"{}"}}"#, "x".repeat(500));
    sock.send_text(&big);
    sock.send_text(r#"{"type":"message","content":"small"}"#);

    // The oversized message never comes back; the next one does.
    assert_eq!(
        sock.recv_json().await,
        json!({"type":"message","user":"alice","content":"small"})
    );
    assert_eq!(d.registry().display_names(), vec!["alice"]);
    assert!(!sock.task.is_finished());
}

#[tokio::test]
async fn stream_end_closes_exactly_once() {
    let d = Arc::new(dispatcher());
    let mut peer = Client::login(&d, "bob");

    let mut sock = connect(&d, limits(Duration::from_secs(60)));
    sock.send_text(r#"{"type":"login","username":"alice"}"#);
    sock.recv_json().await;
    assert_eq!(d.registry().open_connections(), 2);

    sock.to_server.close_channel();
    timeout(Duration::from_secs(2), sock.task).await.unwrap().unwrap();

    let left: Vec<Value> = peer
        .drain()
        .into_iter()
        .filter(|v| v["type"] == "user_left")
        .collect();
    assert_eq!(left, vec![json!({"type":"user_left","user":"alice"})]);
    assert_eq!(d.registry().display_names(), vec!["bob"]);
    assert_eq!(d.registry().open_connections(), 1);
}

#[tokio::test]
async fn close_frame_ends_the_session() {
    let d = Arc::new(dispatcher());
    let sock = connect(&d, limits(Duration::from_secs(60)));
    sock.send_text(r#"{"type":"login","username":"alice"}"#);
    sock.to_server.unbounded_send(Ok(Message::Close(None))).unwrap();

    timeout(Duration::from_secs(2), sock.task).await.unwrap().unwrap();
    assert!(d.registry().is_empty());
    assert_eq!(d.registry().open_connections(), 0);
}

#[tokio::test]
async fn idle_session_is_closed() {
    let d = Arc::new(dispatcher());
    let sock = connect(&d, limits(Duration::from_millis(50)));
    sock.send_text(r#"{"type":"login","username":"alice"}"#);

    timeout(Duration::from_secs(2), sock.task).await.unwrap().unwrap();
    assert!(d.registry().is_empty());
    drop(sock.to_server);
}
