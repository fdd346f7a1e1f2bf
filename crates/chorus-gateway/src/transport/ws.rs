//! WebSocket handler.
//!
//! Responsibilities:
//! - Upgrade HTTP -> WS
//! - Allocate a connection id and an outbound queue per socket
//! - Lifecycle: open -> messages -> close, each reported to the dispatcher once
//! - Keepalive: server ping + idle timeout
//!
//! The session task owns the write half. Everything else (the dispatcher,
//! other sessions' broadcasts) only enqueues onto this session's queue.

use std::sync::Arc;

use axum::{
    extract::{ws::Message, ws::WebSocketUpgrade, State},
    response::Response,
};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tracing::Instrument;

use crate::app_state::AppState;
use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::realtime::{ConnId, Connection};
use crate::transport::codec::{classify, Frame};

/// Per-session knobs, taken from config once per socket.
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    pub ping_every: Duration,
    pub idle_timeout: Duration,
    pub max_frame_bytes: usize,
    pub outbound_queue: usize,
}

impl SessionLimits {
    pub fn from_config(cfg: &GatewayConfig) -> Self {
        Self {
            ping_every: Duration::from_millis(cfg.gateway.ping_interval_ms),
            idle_timeout: Duration::from_millis(cfg.gateway.idle_timeout_ms),
            max_frame_bytes: cfg.chat.max_frame_bytes,
            outbound_queue: cfg.gateway.outbound_queue,
        }
    }
}

// --------------------
// Entry
// --------------------
pub async fn ws_upgrade(State(app): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| async move {
        let dispatcher = app.dispatcher();
        let limits = SessionLimits::from_config(app.cfg());
        let id = dispatcher.registry().next_conn_id();
        let (ws_tx, ws_rx) = socket.split();

        run_session(dispatcher, limits, id, ws_tx, ws_rx)
            .instrument(tracing::info_span!("session", conn = id))
            .await
    })
}

// --------------------
// Core session loop
// --------------------

/// Drive one socket until it closes, errors, or goes idle. `on_open` and
/// `on_close` are each reported exactly once.
pub async fn run_session<S, R, E>(
    dispatcher: Arc<Dispatcher>,
    limits: SessionLimits,
    id: ConnId,
    mut ws_tx: S,
    mut ws_rx: R,
) where
    S: Sink<Message> + Unpin,
    R: Stream<Item = Result<Message, E>> + Unpin,
{
    // ---- outbound queue
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(limits.outbound_queue);
    let conn = Connection::new(id, out_tx);

    // ---- timers
    let ping_every = limits.ping_every;
    let mut ping_tick = tokio::time::interval_at(Instant::now() + ping_every, ping_every);
    ping_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let mut last_activity = Instant::now();

    dispatcher.on_open(&conn);

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                let Some(m) = maybe_out else { break; };
                if ws_tx.send(m).await.is_err() {
                    break;
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                let Ok(msg) = incoming else { break; };

                last_activity = Instant::now();

                match classify(msg, limits.max_frame_bytes) {
                    Frame::Text(raw) => dispatcher.on_message(&conn, &raw),
                    Frame::Oversized { bytes_len } => {
                        tracing::warn!(bytes_len, max_frame_bytes = limits.max_frame_bytes, "oversized frame dropped");
                    }
                    Frame::Binary { bytes_len } => {
                        tracing::debug!(bytes_len, "binary frame ignored");
                    }
                    Frame::Ping(payload) => {
                        if ws_tx.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Frame::Pong => {}
                    Frame::Close => break,
                }
            }

            // ping
            _ = ping_tick.tick() => {
                if ws_tx.send(Message::Ping(Vec::new())).await.is_err() {
                    break;
                }
            }

            // idle timeout
            _ = tokio::time::sleep_until(last_activity + limits.idle_timeout) => {
                tracing::info!("idle timeout");
                break;
            }
        }
    }

    dispatcher.on_close(conn.id());
    let _ = ws_tx.close().await;
}
