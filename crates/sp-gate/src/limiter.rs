//! Fixed-window per-client rate limiter.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::clock::{Clock, SystemClock};

#[derive(Debug, Clone, Copy)]
struct RateWindow {
    count: u32,
    window_start: Instant,
}

impl RateWindow {
    fn expired(&self, now: Instant, window: Duration) -> bool {
        now.duration_since(self.window_start) > window
    }
}

/// Allows `max_requests` calls per client per window. Bursts across a
/// window boundary are accepted.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<String, RateWindow>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self::with_clock(max_requests, window, Arc::new(SystemClock))
    }

    pub fn with_clock(max_requests: u32, window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { max_requests, window, clock, windows: Mutex::new(HashMap::new()) }
    }

    pub fn allow(&self, client_id: &str) -> bool {
        let now = self.clock.now();
        let mut windows = self.windows.lock();

        match windows.get_mut(client_id) {
            Some(w) if !w.expired(now, self.window) => {
                if w.count < self.max_requests {
                    w.count += 1;
                    true
                } else {
                    warn!(client_id, limit = self.max_requests, "rate limit exceeded");
                    false
                }
            }
            _ => {
                windows.insert(client_id.to_string(), RateWindow { count: 1, window_start: now });
                true
            }
        }
    }

    /// Calls the client may still make in its current window.
    pub fn remaining(&self, client_id: &str) -> u32 {
        let now = self.clock.now();
        match self.windows.lock().get(client_id) {
            Some(w) if !w.expired(now, self.window) => self.max_requests.saturating_sub(w.count),
            _ => self.max_requests,
        }
    }

    /// Drop windows that have already run out. Returns how many were removed.
    pub fn prune(&self) -> usize {
        let now = self.clock.now();
        let mut windows = self.windows.lock();
        let before = windows.len();
        windows.retain(|_, w| !w.expired(now, self.window));
        before - windows.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.lock().len()
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
