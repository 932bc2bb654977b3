//! Snapshot Feed
//!
//! Simulated telemetry source plus the background poller that keeps the
//! last good snapshot available to the API:
//! - `SimulatedFeed` - async fetch with an artificial round-trip delay
//! - `SnapshotStore` - wholesale snapshot replacement, failures keep the old one
//! - `spawn_poller` - fixed-interval refresh with idempotent cancellation

use bulan_telemetry::{FleetSnapshot, SimulatorConfig, TelemetryError, TelemetrySimulator};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::config::GatewayConfig;

// ============================================================================
// Simulated Feed
// ============================================================================

pub struct SimulatedFeed {
    simulator: Mutex<TelemetrySimulator>,
    delay: Duration,
}

impl SimulatedFeed {
    pub fn new(simulator: TelemetrySimulator, delay: Duration) -> Self {
        Self {
            simulator: Mutex::new(simulator),
            delay,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, TelemetryError> {
        let sim_config = SimulatorConfig::default().with_fleet_size(config.fleet_size);
        let simulator = match config.seed {
            Some(seed) => TelemetrySimulator::seeded(sim_config, seed)?,
            None => TelemetrySimulator::from_entropy(sim_config)?,
        };
        Ok(Self::new(simulator, config.fetch_delay))
    }

    /// Fetch a fresh snapshot after the simulated network delay.
    ///
    /// Dropping the future before it resolves has no effect on the simulator.
    pub async fn fetch_snapshot(&self) -> Result<FleetSnapshot, TelemetryError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.simulator.lock().await.snapshot()
    }
}

// ============================================================================
// Snapshot Store
// ============================================================================

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedStatus {
    pub generation: Option<u64>,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub successes: u64,
    pub failures: u64,
}

#[derive(Default)]
struct StoreInner {
    current: Option<Arc<FleetSnapshot>>,
    status: FeedStatus,
}

/// Holds the latest good snapshot. Readers get a shared immutable copy.
#[derive(Default)]
pub struct SnapshotStore {
    inner: RwLock<StoreInner>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Option<Arc<FleetSnapshot>> {
        self.inner.read().await.current.clone()
    }

    pub async fn status(&self) -> FeedStatus {
        self.inner.read().await.status.clone()
    }

    /// Replace the snapshot on success; on failure keep it and note the error.
    ///
    /// A snapshot no newer than the stored one is discarded, so overlapping
    /// fetches that finish out of order never move the store backwards.
    /// Returns the generation now held.
    pub async fn record(
        &self,
        result: Result<FleetSnapshot, TelemetryError>,
    ) -> Result<u64, TelemetryError> {
        let mut inner = self.inner.write().await;
        match result {
            Ok(snapshot) => {
                let generation = snapshot.generation;
                if let Some(held) = inner.status.generation.filter(|&held| held >= generation) {
                    debug!("Discarding snapshot generation {} (holding {})", generation, held);
                    return Ok(held);
                }
                inner.status.generation = Some(generation);
                inner.status.last_success = Some(snapshot.generated_at);
                inner.status.last_error = None;
                inner.status.successes += 1;
                inner.current = Some(Arc::new(snapshot));
                Ok(generation)
            }
            Err(e) => {
                inner.status.last_error = Some(e.to_string());
                inner.status.failures += 1;
                Err(e)
            }
        }
    }
}

// ============================================================================
// Poller
// ============================================================================

/// Handle to a running poller. Dropping it cancels the poller.
pub struct PollHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop polling. Safe to call any number of times.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Cancel and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Err(e) = (&mut self.task).await {
            error!("Snapshot poller task failed: {}", e);
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.send_replace(true);
    }
}

/// Fetch immediately, then every `period`, until cancelled.
///
/// A fetch still in flight at cancellation is dropped and never stored.
pub fn spawn_poller(
    feed: Arc<SimulatedFeed>,
    store: Arc<SnapshotStore>,
    period: Duration,
) -> PollHandle {
    let (cancel, mut cancelled) = watch::channel(false);
    let period = period.max(Duration::from_millis(1));

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancelled.changed() => break,
                _ = interval.tick() => {}
            }

            let result = tokio::select! {
                biased;
                _ = cancelled.changed() => break,
                result = feed.fetch_snapshot() => result,
            };

            match store.record(result).await {
                Ok(generation) => debug!("Snapshot generation {} stored", generation),
                Err(e) => error!("Snapshot fetch failed, keeping previous: {}", e),
            }
        }

        info!("Snapshot poller stopped");
    });

    PollHandle { cancel, task }
}
