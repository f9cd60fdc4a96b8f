//! Application state.

use chrono::{DateTime, Utc};
use decomp_core::SubtaskEngine;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Subtask engine, built once at startup
    pub engine: Arc<SubtaskEngine>,
    /// Server start time
    pub start_time: Instant,
    /// Wall-clock start time reported by /health
    pub started_at: DateTime<Utc>,
    /// Active request count
    pub active_requests: Arc<AtomicUsize>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config, engine: SubtaskEngine) -> Arc<Self> {
        Arc::new(Self {
            config: Arc::new(config),
            engine: Arc::new(engine),
            start_time: Instant::now(),
            started_at: Utc::now(),
            active_requests: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Count a request as in flight until the guard drops
    pub fn track_request(&self) -> InFlight {
        self.active_requests.fetch_add(1, Ordering::SeqCst);
        InFlight {
            counter: Arc::clone(&self.active_requests),
        }
    }

    pub fn pending_requests(&self) -> usize {
        self.active_requests.load(Ordering::SeqCst)
    }
}

/// Decrements the active request count on drop
pub struct InFlight {
    counter: Arc<AtomicUsize>,
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}
