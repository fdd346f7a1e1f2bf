//! Frame classifier for the transport layer.
//!
//! - Text frames => handed to the dispatcher as raw JSON (if within size limit)
//! - Binary frames => ignored; the protocol is text only
//! - Ping/Pong/Close are surfaced for lifecycle management

use axum::extract::ws::Message;

#[derive(Debug, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Oversized { bytes_len: usize },
    Binary { bytes_len: usize },
    Ping(Vec<u8>),
    Pong,
    Close,
}

pub fn classify(msg: Message, max_frame_bytes: usize) -> Frame {
    match msg {
        Message::Text(s) => {
            let bytes_len = s.len();
            if bytes_len > max_frame_bytes {
                Frame::Oversized { bytes_len }
            } else {
                Frame::Text(s)
            }
        }
        Message::Binary(b) => Frame::Binary { bytes_len: b.len() },
        Message::Ping(v) => Frame::Ping(v),
        Message::Pong(_) => Frame::Pong,
        Message::Close(_) => Frame::Close,
    }
}
