//! Batch Coordinator: concurrent, failure-isolated fetches for many locations.
//!
//! # Responsibilities
//! - Serve fresh cache entries without dispatching a fetch
//! - Dispatch one guarded fetch per stale or missing location, all concurrently
//! - Settle each outcome as soon as it resolves (cache write, default, or drop)
//! - Reject overlapping batch runs
//!
//! # State Transitions
//! ```text
//! Idle → Running: fetch_all() accepted
//! Running → Idle: fetch_all() returns or its future is dropped
//! Running + fetch_all() → BatchError::Busy
//! ```

use chrono::Utc;
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::cache::ReadingCache;
use crate::config::EngineConfig;
use crate::lifecycle::CancellationScope;
use crate::model::{Coordinates, Location, LocationId, Outcome, Reading};
use crate::observability::metrics;
use crate::resilience::DeadlineGuard;
use crate::source::DataSource;

/// Coordinator run state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle = 0,
    Running = 1,
}

impl From<u8> for BatchState {
    fn from(val: u8) -> Self {
        match val {
            1 => BatchState::Running,
            _ => BatchState::Idle,
        }
    }
}

/// Errors returned by the coordinator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    /// A previous `fetch_all` is still outstanding.
    #[error("a batch fetch is already running")]
    Busy,
}

/// Per-run counters, logged when the run finishes.
#[derive(Debug, Default)]
struct BatchStats {
    requested: usize,
    cache_hits: usize,
    dispatched: usize,
    succeeded: usize,
    timed_out: usize,
    failed: usize,
    cancelled: usize,
}

/// Fans fetches out across locations and folds the outcomes back together.
pub struct BatchCoordinator<S> {
    source: S,
    cache: ReadingCache,
    budget: Duration,
    state: AtomicU8,
}

impl<S: DataSource> BatchCoordinator<S> {
    pub fn new(source: S, cache: ReadingCache, budget: Duration) -> Self {
        Self {
            source,
            cache,
            budget,
            state: AtomicU8::new(BatchState::Idle as u8),
        }
    }

    pub fn from_config(source: S, config: &EngineConfig) -> Self {
        Self::new(
            source,
            ReadingCache::new(config.cache.ttl()),
            config.deadline.budget(),
        )
    }

    /// Scope for a new consumer of this coordinator.
    pub fn new_scope(&self) -> CancellationScope {
        CancellationScope::new()
    }

    pub fn cache(&self) -> &ReadingCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> BatchState {
        BatchState::from(self.state.load(Ordering::Acquire))
    }

    /// Fetch readings for every location.
    ///
    /// The map holds one entry per distinct location id, except locations
    /// whose fetch was cancelled. Failed and timed-out locations get
    /// `Reading::unavailable`. Repeated ids are fetched once.
    pub async fn fetch_all(
        &self,
        locations: &[Location],
        scope: &CancellationScope,
    ) -> Result<HashMap<LocationId, Reading>, BatchError> {
        let _running = self.begin()?;
        let started = Instant::now();
        let mut stats = BatchStats::default();
        let mut results = HashMap::with_capacity(locations.len());

        if !scope.is_active() {
            tracing::debug!(scope_id = %scope.id(), "Batch skipped, scope already cancelled");
            return Ok(results);
        }

        let now = Utc::now();
        let mut seen = HashSet::with_capacity(locations.len());
        let mut pending = FuturesUnordered::new();

        for location in locations {
            if !seen.insert(&location.id) {
                continue;
            }
            stats.requested += 1;

            if let Some(reading) = self.lookup(&location.id, now) {
                stats.cache_hits += 1;
                results.insert(location.id.clone(), reading);
                continue;
            }

            let guard = DeadlineGuard::new(self.budget, scope);
            pending.push(self.guarded_fetch(location.id.clone(), location.coordinates, guard));
        }
        stats.dispatched = pending.len();

        while let Some((id, outcome)) = pending.next().await {
            if let Some(reading) = self.settle(&id, outcome, scope, &mut stats) {
                results.insert(id, reading);
            }
        }

        metrics::record_batch("completed");
        tracing::info!(
            scope_id = %scope.id(),
            requested = stats.requested,
            cache_hits = stats.cache_hits,
            dispatched = stats.dispatched,
            succeeded = stats.succeeded,
            timed_out = stats.timed_out,
            failed = stats.failed,
            cancelled = stats.cancelled,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch fetch finished"
        );

        Ok(results)
    }

    /// Refresh a single location (e.g. a tapped marker).
    ///
    /// Returns `None` when the scope is cancelled before the outcome can be
    /// applied. Does not take the batch running flag.
    pub async fn fetch_one(&self, location: &Location, scope: &CancellationScope) -> Option<Reading> {
        if !scope.is_active() {
            return None;
        }
        if let Some(reading) = self.lookup(&location.id, Utc::now()) {
            return Some(reading);
        }

        let guard = DeadlineGuard::new(self.budget, scope);
        let (id, outcome) = self
            .guarded_fetch(location.id.clone(), location.coordinates, guard)
            .await;
        self.settle(&id, outcome, scope, &mut BatchStats::default())
    }

    fn begin(&self) -> Result<RunningGuard<'_>, BatchError> {
        self.state
            .compare_exchange(
                BatchState::Idle as u8,
                BatchState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|_| {
                metrics::record_batch("rejected");
                tracing::debug!("Batch fetch rejected, previous run still outstanding");
                BatchError::Busy
            })?;
        Ok(RunningGuard { state: &self.state })
    }

    fn lookup(&self, id: &LocationId, now: chrono::DateTime<Utc>) -> Option<Reading> {
        match self.cache.get(id) {
            Some(entry) if !entry.is_stale(now, self.cache.ttl()) => {
                metrics::record_cache_lookup("hit");
                Some(entry.reading)
            }
            Some(_) => {
                metrics::record_cache_lookup("stale");
                None
            }
            None => {
                metrics::record_cache_lookup("miss");
                None
            }
        }
    }

    async fn guarded_fetch(
        &self,
        id: LocationId,
        coords: Coordinates,
        guard: DeadlineGuard,
    ) -> (LocationId, Outcome) {
        let started = Instant::now();
        let outcome = guard.run(self.source.fetch(coords)).await;
        metrics::record_fetch_duration(started.elapsed().as_secs_f64());
        (id, outcome)
    }

    /// Apply one outcome. Returns the reading to surface, if any.
    fn settle(
        &self,
        id: &LocationId,
        outcome: Outcome,
        scope: &CancellationScope,
        stats: &mut BatchStats,
    ) -> Option<Reading> {
        // A fetch can resolve in the same instant the scope is cancelled.
        let outcome = if scope.is_active() {
            outcome
        } else {
            Outcome::Cancelled
        };
        metrics::record_fetch_outcome(outcome.kind());

        match outcome {
            Outcome::Success(reading) => {
                stats.succeeded += 1;
                self.cache.put(id.clone(), reading.clone(), Utc::now());
                tracing::debug!(location = %id, aqi = reading.aqi, "Location fetched");
                Some(reading)
            }
            Outcome::Timeout => {
                stats.timed_out += 1;
                tracing::warn!(
                    location = %id,
                    budget_ms = self.budget.as_millis() as u64,
                    "Location fetch timed out, using default reading"
                );
                Some(Reading::unavailable(Utc::now()))
            }
            Outcome::SourceError(e) => {
                stats.failed += 1;
                tracing::warn!(location = %id, error = %e, "Location fetch failed, using default reading");
                Some(Reading::unavailable(Utc::now()))
            }
            Outcome::Cancelled => {
                stats.cancelled += 1;
                tracing::debug!(location = %id, "Location fetch cancelled");
                None
            }
        }
    }
}

impl<S> std::fmt::Debug for BatchCoordinator<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchCoordinator")
            .field("budget", &self.budget)
            .field("ttl", &self.cache.ttl())
            .field("cached", &self.cache.len())
            .field("state", &BatchState::from(self.state.load(Ordering::Relaxed)))
            .finish()
    }
}

/// Returns the coordinator to Idle when the run ends, including when the
/// `fetch_all` future is dropped.
struct RunningGuard<'a> {
    state: &'a AtomicU8,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.state.store(BatchState::Idle as u8, Ordering::Release);
    }
}
