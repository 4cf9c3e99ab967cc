//! Latency Simulator
//!
//! Stands in for a network round trip by suspending for a pseudo-random delay.
//! Keyed requests are deduplicated for the lifetime of the cache: once a key
//! has been seen, later requests for it return immediately.
//!
//! The key is marked *before* the delay starts, so a concurrent second request
//! for the same key is treated as a hit even while the first is still waiting.
//! There is no coalescing onto the first request's wait.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Latency simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyConfig {
    /// When false, requests never sleep (keys are still tracked)
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Exclusive upper bound of the simulated delay, in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_max_delay_ms() -> u64 {
    800
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

impl LatencyConfig {
    /// Config that never sleeps
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.max_delay_ms == 0 {
            return Err("max_delay_ms must be greater than 0 when latency is enabled".to_string());
        }
        Ok(())
    }
}

/// Set of request keys seen during one session.
///
/// Shared through an `Arc` so a session's state can be injected into, or
/// inspected from, outside the simulator.
#[derive(Debug, Default)]
pub struct DedupCache {
    seen: Mutex<HashSet<String>>,
}

impl DedupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` as seen. Returns false if it was already marked.
    pub fn mark(&self, key: &str) -> bool {
        self.seen.lock().insert(key.to_string())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.seen.lock().contains(key)
    }

    pub fn forget(&self, key: &str) -> bool {
        self.seen.lock().remove(key)
    }

    pub fn clear(&self) {
        self.seen.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.seen.lock().is_empty()
    }
}

/// What a call to [`LatencySimulator::request`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// No key was given; the cache was cleared.
    Cleared,
    /// The key was already marked; no delay.
    Hit,
    /// The key was new (or the call was unkeyed) and paid this delay.
    Delayed(Duration),
}

pub struct LatencySimulator {
    config: LatencyConfig,
    cache: Arc<DedupCache>,
    rng: Mutex<StdRng>,
}

impl LatencySimulator {
    pub fn new(config: LatencyConfig) -> Self {
        Self::with_cache(config, Arc::new(DedupCache::new()))
    }

    /// Simulator backed by an existing (possibly shared) cache
    pub fn with_cache(config: LatencyConfig, cache: Arc<DedupCache>) -> Self {
        Self {
            config,
            cache,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Make the delay sequence reproducible
    pub fn with_seed(self, seed: u64) -> Self {
        *self.rng.lock() = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &LatencyConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<DedupCache> {
        &self.cache
    }

    pub fn is_cached(&self, key: &str) -> bool {
        self.cache.contains(key)
    }

    /// Forget every key seen so far.
    pub fn reset(&self) {
        self.cache.clear();
    }

    /// Forget one key so its next request pays latency again.
    pub fn invalidate(&self, key: &str) {
        self.cache.forget(key);
    }

    /// Gate a logical request.
    ///
    /// * `None` clears the cache and returns immediately.
    /// * A marked key returns immediately.
    /// * A new key is marked, then the call sleeps for `[0, max_delay_ms)`.
    pub async fn request(&self, key: Option<&str>) -> RequestOutcome {
        let Some(key) = key else {
            self.reset();
            debug!("Latency cache cleared");
            return RequestOutcome::Cleared;
        };

        if !self.cache.mark(key) {
            debug!(key, "Latency cache hit");
            return RequestOutcome::Hit;
        }

        let delay = self.wait().await;
        debug!(key, delay_ms = delay.as_millis() as u64, "Simulated latency");
        RequestOutcome::Delayed(delay)
    }

    /// Unkeyed request that always pays the full simulated latency.
    ///
    /// Clears the cache first, so reads cached before a mutation are delayed
    /// (and therefore re-fetched) afterwards.
    pub async fn uncached(&self) -> RequestOutcome {
        self.reset();
        let delay = self.wait().await;
        debug!(delay_ms = delay.as_millis() as u64, "Simulated uncached latency");
        RequestOutcome::Delayed(delay)
    }

    async fn wait(&self) -> Duration {
        let delay = self.next_delay();
        if self.config.enabled && !delay.is_zero() {
            sleep(delay).await;
        }
        delay
    }

    fn next_delay(&self) -> Duration {
        if self.config.max_delay_ms == 0 {
            return Duration::ZERO;
        }
        let millis = self.rng.lock().gen_range(0..self.config.max_delay_ms);
        Duration::from_millis(millis)
    }
}
