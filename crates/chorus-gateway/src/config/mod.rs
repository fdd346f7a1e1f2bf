//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use chorus_core::error::{ChorusError, Result};

pub use schema::{ChatSection, GatewayConfig, GatewaySection, NamePolicy};

/// Explicit config path. A missing file at this path is fatal.
pub const CONFIG_ENV: &str = "CHORUS_CONFIG";
/// Overrides `gateway.listen`.
pub const LISTEN_ENV: &str = "CHORUS_LISTEN";
/// Looked up in the working directory when `CHORUS_CONFIG` is unset.
pub const DEFAULT_PATH: &str = "chorus.yaml";

pub fn load_from_file(path: &str) -> Result<GatewayConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ChorusError::Internal(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<GatewayConfig> {
    let cfg: GatewayConfig = serde_yaml::from_str(s)
        .map_err(|e| ChorusError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Resolve config from the process environment.
pub fn load_from_env() -> Result<GatewayConfig> {
    load_with(
        std::env::var(CONFIG_ENV).ok(),
        std::env::var(LISTEN_ENV).ok(),
        Path::new(DEFAULT_PATH),
    )
}

/// An explicit path must exist; `default_path` is optional and falls back to
/// built-in defaults. `listen` overrides `gateway.listen` in either case.
pub fn load_with(
    explicit_path: Option<String>,
    listen: Option<String>,
    default_path: &Path,
) -> Result<GatewayConfig> {
    let mut cfg = match explicit_path {
        Some(path) => load_from_file(&path)?,
        None if default_path.exists() => load_from_file(&default_path.to_string_lossy())?,
        None => {
            tracing::info!(path = %default_path.display(), "no config file, using built-in defaults");
            GatewayConfig::default()
        }
    };

    if let Some(listen) = listen {
        cfg.gateway.listen = listen;
    }

    cfg.validate()?;
    Ok(cfg)
}
