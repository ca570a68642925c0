// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Per-client sliding window rate limiting
//!
//! Each client identity owns an ordered list of admission instants guarded by
//! its own lock, so the purge/check/record sequence for one identity is
//! atomic while different identities never contend. Windows that have gone
//! fully stale are evicted by an opportunistic sweep that only ever uses
//! `try_lock` and therefore never blocks an admission.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use rand::Rng;

use crate::config::RateLimitConfig;

/// Identity shared by every client without a usable address.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub admitted: bool,
    /// Requests per window
    pub limit: usize,
    /// Admissions left in the current window
    pub remaining: usize,
    /// When the oldest counted request leaves the window
    pub reset_at: Instant,
}

impl RateDecision {
    /// Whole seconds until `reset_at`, rounded up.
    pub fn retry_after_secs(&self, now: Instant) -> u64 {
        let wait = self.reset_at.saturating_duration_since(now);
        let secs = wait.as_secs();
        if wait.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        }
    }
}

type Window = Arc<Mutex<VecDeque<Instant>>>;

/// Sliding window admission control keyed by client identity.
pub struct RateGovernor {
    max_requests: usize,
    window: Duration,
    sweep_probability: f64,
    windows: Mutex<HashMap<String, Window>>,
}

impl std::fmt::Debug for RateGovernor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateGovernor")
            .field("max_requests", &self.max_requests)
            .field("window", &self.window)
            .field("sweep_probability", &self.sweep_probability)
            .field("identities", &self.identity_count())
            .finish()
    }
}

fn lock_recover<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!(target: "mockshell.rate_limit", "{} lock was poisoned, recovering", what);
            poisoned.into_inner()
        }
    }
}

/// Drop every instant that is at least `window` old.
fn purge(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = timestamps.front() {
        if now.saturating_duration_since(*oldest) >= window {
            timestamps.pop_front();
        } else {
            break;
        }
    }
}

impl RateGovernor {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            sweep_probability: 0.0,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.max_requests,
            Duration::from_secs(config.window_secs),
        )
        .with_sweep_probability(config.sweep_probability)
    }

    /// Probability that an admission triggers a sweep of stale identities.
    pub fn with_sweep_probability(mut self, probability: f64) -> Self {
        self.sweep_probability = probability.clamp(0.0, 1.0);
        self
    }

    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Number of identities currently tracked.
    pub fn identity_count(&self) -> usize {
        lock_recover(&self.windows, "Rate window map").len()
    }

    fn window_for(&self, identity: &str) -> Window {
        let mut windows = lock_recover(&self.windows, "Rate window map");
        Arc::clone(windows.entry(identity.to_string()).or_default())
    }

    /// Admit the request from `identity` at the current instant.
    pub fn admit_now(&self, identity: &str) -> RateDecision {
        self.admit(identity, Instant::now())
    }

    /// Decide whether `identity` may make a request at `now`, recording it
    /// when admitted.
    pub fn admit(&self, identity: &str, now: Instant) -> RateDecision {
        let window = self.window_for(identity);

        let decision = {
            let mut timestamps = lock_recover(&window, "Rate window");
            purge(&mut timestamps, now, self.window);

            if timestamps.len() >= self.max_requests {
                let oldest = timestamps.front().copied().unwrap_or(now);
                RateDecision {
                    admitted: false,
                    limit: self.max_requests,
                    remaining: 0,
                    reset_at: oldest + self.window,
                }
            } else {
                timestamps.push_back(now);
                let oldest = timestamps.front().copied().unwrap_or(now);
                RateDecision {
                    admitted: true,
                    limit: self.max_requests,
                    remaining: self.max_requests - timestamps.len(),
                    reset_at: oldest + self.window,
                }
            }
        };
        drop(window);

        if !decision.admitted {
            tracing::debug!(
                target: "mockshell.rate_limit",
                identity,
                "request rejected, window full"
            );
        }

        if self.sweep_probability > 0.0 && rand::rng().random_bool(self.sweep_probability) {
            self.sweep(now);
        }

        decision
    }

    /// Evict identities whose windows are entirely stale.
    ///
    /// Skips the sweep when the map is busy and skips any window that is
    /// locked or referenced by an in-flight admission. Returns the number of
    /// evicted identities.
    pub fn sweep(&self, now: Instant) -> usize {
        let mut windows = match self.windows.try_lock() {
            Ok(guard) => guard,
            Err(_) => return 0,
        };

        let before = windows.len();
        windows.retain(|_, window| {
            // Handles are only cloned under the map lock, so a count of one
            // means no admission is holding this window.
            if Arc::strong_count(window) > 1 {
                return true;
            }
            match window.try_lock() {
                Ok(mut timestamps) => {
                    purge(&mut timestamps, now, self.window);
                    !timestamps.is_empty()
                }
                Err(_) => true,
            }
        });

        let evicted = before - windows.len();
        if evicted > 0 {
            tracing::debug!(target: "mockshell.rate_limit", evicted, "swept stale rate windows");
        }
        evicted
    }
}

/// Derive the client identity from a forwarded-address header value.
///
/// Uses the first comma-separated entry; absent or blank values share the
/// [`UNKNOWN_IDENTITY`] bucket.
pub fn client_identity(forwarded_for: Option<&str>) -> String {
    forwarded_for
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_IDENTITY)
        .to_string()
}
