//! Shared application state for the chorus gateway.
//!
//! Wires Registry + Broadcaster + Estimator into one Dispatcher instance.
//! There is no global server object; tests build their own state.

use std::sync::Arc;

use chorus_core::error::Result;

use crate::compat::{CompatibilityEstimator, RandomEstimator};
use crate::config::GatewayConfig;
use crate::dispatch::Dispatcher;
use crate::realtime::{Broadcaster, Registry};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    dispatcher: Arc<Dispatcher>,
}

struct AppStateInner {
    cfg: GatewayConfig,
}

impl AppState {
    /// Build application state with the placeholder estimator.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        Self::with_estimator(cfg, Arc::new(RandomEstimator))
    }

    pub fn with_estimator(
        cfg: GatewayConfig,
        estimator: Arc<dyn CompatibilityEstimator>,
    ) -> Result<Self> {
        cfg.validate()?;

        let registry = Arc::new(Registry::new());
        let broadcaster = Arc::new(Broadcaster::new());
        let dispatcher = Dispatcher::new(registry, broadcaster, estimator, cfg.chat.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg }),
            dispatcher: Arc::new(dispatcher),
        })
    }

    pub fn cfg(&self) -> &GatewayConfig {
        &self.inner.cfg
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(self.dispatcher.registry())
    }
}
