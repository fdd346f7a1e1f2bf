//! chorus gateway
//!
//! - WebSocket endpoint: `/` and `/ws`
//! - Config: `CHORUS_CONFIG` or `./chorus.yaml`, `CHORUS_LISTEN` override
//! - Bind failure exits non-zero

use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

use chorus_core::error::{ChorusError, Result};
use chorus_gateway::{app_state, config, router};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code().as_str(), "chorus-gateway failed: {e}");
        eprintln!("chorus-gateway: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_from_env()?;
    let listen = cfg.gateway.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| ChorusError::Internal(format!("failed to bind {listen}: {e}")))?;
    tracing::info!(%listen, "chorus-gateway listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| ChorusError::Internal(format!("server failed: {e}")))
}
