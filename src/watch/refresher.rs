//! Periodic refresh of a location set.
//!
//! # Responsibilities
//! - Tick on a fixed interval and run a batch for the current locations
//! - Pick up location changes published by the config watcher
//! - Stop as soon as the owning scope is cancelled

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

use crate::batch::{BatchCoordinator, BatchError};
use crate::config::EngineConfig;
use crate::lifecycle::CancellationScope;
use crate::model::{Location, LocationId, Reading};
use crate::source::DataSource;

/// Drives `fetch_all` on an interval until cancelled.
pub struct Refresher<S> {
    coordinator: Arc<BatchCoordinator<S>>,
    locations: Arc<ArcSwap<Vec<Location>>>,
    interval: Duration,
}

impl<S: DataSource> Refresher<S> {
    pub fn new(coordinator: Arc<BatchCoordinator<S>>, locations: Vec<Location>, interval: Duration) -> Self {
        Self {
            coordinator,
            locations: Arc::new(ArcSwap::from_pointee(locations)),
            interval,
        }
    }

    /// Handle for replacing the location set while running.
    pub fn locations(&self) -> Arc<ArcSwap<Vec<Location>>> {
        self.locations.clone()
    }

    /// Run one refresh for the current location set.
    pub async fn tick(&self, scope: &CancellationScope) -> Option<HashMap<LocationId, Reading>> {
        let locations = self.locations.load_full();
        match self.coordinator.fetch_all(&locations, scope).await {
            Ok(readings) => Some(readings),
            Err(BatchError::Busy) => {
                tracing::debug!("Refresh skipped, previous batch still running");
                None
            }
        }
    }

    /// Tick until `scope` is cancelled, handing each result to `on_refresh`.
    pub async fn run<F>(self, scope: CancellationScope, mut on_refresh: F)
    where
        F: FnMut(&HashMap<LocationId, Reading>),
    {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            locations = self.locations.load().len(),
            scope_id = %scope.id(),
            "Refresher starting"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = scope.cancelled() => {
                    tracing::info!("Refresher received cancellation, exiting loop");
                    break;
                }
                _ = ticker.tick() => {
                    if let Some(readings) = self.tick(&scope).await {
                        if scope.is_active() {
                            on_refresh(&readings);
                        }
                    }
                }
            }
        }
    }
}

/// Apply validated config reloads to a running refresher's location set.
pub async fn apply_config_updates(
    locations: Arc<ArcSwap<Vec<Location>>>,
    mut updates: mpsc::UnboundedReceiver<EngineConfig>,
    scope: CancellationScope,
) {
    loop {
        tokio::select! {
            _ = scope.cancelled() => break,
            update = updates.recv() => match update {
                Some(config) => {
                    let next = config.locations();
                    tracing::info!(locations = next.len(), "Location set reloaded");
                    locations.store(Arc::new(next));
                }
                None => break,
            },
        }
    }
}
