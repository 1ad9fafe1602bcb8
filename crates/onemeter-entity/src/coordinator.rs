//! Data update coordinator
//!
//! Owns the latest device snapshot and refreshes it on a fixed interval.
//! The blocking cloud call runs on a worker thread; a failed refresh
//! keeps the previous snapshot.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use onemeter_core::{ApiError, DeviceSnapshot, MeterApi, DEFAULT_SYNC_INTERVAL};

/// Holds the last poll result for the entity layer.
pub struct MeterCoordinator {
    api: Arc<dyn MeterApi>,
    interval: Duration,
    data: RwLock<Option<DeviceSnapshot>>,
}

impl MeterCoordinator {
    pub fn new(api: Arc<dyn MeterApi>, interval: Duration) -> Self {
        Self {
            api,
            interval,
            data: RwLock::new(None),
        }
    }

    /// Host identifier of the underlying cloud client.
    pub fn host(&self) -> &str {
        self.api.host()
    }

    /// Polling interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fetch a fresh snapshot.
    ///
    /// On failure the previous snapshot stays in place and the error is
    /// returned after being logged.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let api = Arc::clone(&self.api);
        let result = tokio::task::spawn_blocking(move || api.fetch_device())
            .await
            .map_err(|err| ApiError::Internal(err.to_string()))?;

        match result {
            Ok(snapshot) => {
                debug!(keys = snapshot.len(), "Refreshed device snapshot");
                *self.data.write().await = Some(snapshot);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Snapshot refresh failed, keeping previous data");
                Err(err)
            }
        }
    }

    /// Clone of the current snapshot, if any.
    pub async fn data(&self) -> Option<DeviceSnapshot> {
        self.data.read().await.clone()
    }

    /// True iff the coordinator has produced any data: a missing or empty
    /// snapshot counts as none.
    pub async fn has_data(&self) -> bool {
        matches!(&*self.data.read().await, Some(snapshot) if !snapshot.is_empty())
    }

    /// Replace the snapshot directly (used by tests and push updates).
    pub async fn set_data(&self, snapshot: Option<DeviceSnapshot>) {
        *self.data.write().await = snapshot;
    }

    /// Start the periodic refresh loop. Failures are logged inside
    /// `refresh`; the loop just waits for the next tick.
    ///
    /// `tokio::time::interval` panics on a zero period, so a zero
    /// interval falls back to the default cadence.
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let coordinator = Arc::clone(self);
        let period = if coordinator.interval.is_zero() {
            warn!(
                "Zero sync interval configured, falling back to {}s",
                DEFAULT_SYNC_INTERVAL
            );
            Duration::from_secs(DEFAULT_SYNC_INTERVAL)
        } else {
            coordinator.interval
        };
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let _ = coordinator.refresh().await;
            }
        })
    }
}
