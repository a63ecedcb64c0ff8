use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use axum::extract::FromRef;

use crate::config::Config;

#[derive(Clone, Debug)]
pub struct AppState {
    started_at: Instant,
    /// Completed simulation runs since startup
    simulations_run: Arc<AtomicU64>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            simulations_run: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn record_run(&self) -> u64 {
        self.simulations_run.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn simulations_run(&self) -> u64 {
        self.simulations_run.load(Ordering::Relaxed)
    }
}

/// Router state. Handlers extract `State<AppState>` and/or `State<Config>`.
#[derive(Clone, Debug)]
pub struct SharedState {
    pub app: AppState,
    pub config: Config,
}

impl FromRef<SharedState> for AppState {
    fn from_ref(shared: &SharedState) -> Self {
        shared.app.clone()
    }
}

impl FromRef<SharedState> for Config {
    fn from_ref(shared: &SharedState) -> Self {
        shared.config.clone()
    }
}
