//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness
//! - `/readyz`  : open sockets and logged-in users

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app_state::AppState;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let reg = state.registry();
    (
        StatusCode::OK,
        Json(json!({
            "connections": reg.open_connections(),
            "active": reg.len(),
        })),
    )
}
