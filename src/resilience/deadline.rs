//! Deadline Guard: one fetch raced against a time budget and its scope.
//!
//! # Design Decisions
//! - A guard is a value created per dispatch and consumed by `run`; there is
//!   no shared table of pending timers to clean up
//! - Losing branches are dropped when `run` returns, which releases the
//!   timer and abandons the in-flight call
//! - Cancellation wins ties so nothing is surfaced after `cancel()`

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::lifecycle::CancellationScope;
use crate::model::{Outcome, Reading};
use crate::source::SourceResult;

/// Default per-location budget.
pub const DEFAULT_BUDGET: Duration = Duration::from_secs(8);

/// Races one fetch against a fixed budget and a cancellation token.
#[derive(Debug)]
pub struct DeadlineGuard {
    budget: Duration,
    token: CancellationToken,
}

impl DeadlineGuard {
    /// Create a guard for a fetch dispatched under `scope`.
    pub fn new(budget: Duration, scope: &CancellationScope) -> Self {
        Self {
            budget,
            token: scope.child_token(),
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Drive `fetch` to exactly one `Outcome`.
    pub async fn run<F>(self, fetch: F) -> Outcome
    where
        F: Future<Output = SourceResult<Reading>>,
    {
        if self.token.is_cancelled() {
            return Outcome::Cancelled;
        }

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Outcome::Cancelled,
            result = tokio::time::timeout(self.budget, fetch) => match result {
                Ok(Ok(reading)) => Outcome::Success(reading),
                Ok(Err(e)) => Outcome::SourceError(e),
                Err(_) => Outcome::Timeout,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Endpoint, SourceError};
    use chrono::Utc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    /// Sets its flag when dropped, proving the abandoned fetch was released.
    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_success_within_budget() {
        let scope = CancellationScope::new();
        let guard = DeadlineGuard::new(Duration::from_millis(500), &scope);
        let outcome = guard
            .run(async { Ok(Reading::unavailable(Utc::now())) })
            .await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_source_error_passes_through() {
        let scope = CancellationScope::new();
        let guard = DeadlineGuard::new(Duration::from_millis(500), &scope);
        let outcome = guard
            .run(async {
                Err(SourceError::Status {
                    endpoint: Endpoint::Weather,
                    status: 500,
                })
            })
            .await;
        assert!(matches!(outcome, Outcome::SourceError(SourceError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_timeout_releases_fetch() {
        let scope = CancellationScope::new();
        let budget = Duration::from_millis(50);
        let guard = DeadlineGuard::new(budget, &scope);
        let dropped = Arc::new(AtomicBool::new(false));
        let flag = DropFlag(dropped.clone());

        let start = Instant::now();
        let outcome = guard
            .run(async move {
                let _flag = flag;
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok(Reading::unavailable(Utc::now()))
            })
            .await;

        assert!(matches!(outcome, Outcome::Timeout));
        assert!(start.elapsed() < budget + Duration::from_millis(500));
        assert!(dropped.load(Ordering::SeqCst), "timed-out fetch was not released");
    }

    #[tokio::test]
    async fn test_cancel_mid_flight() {
        let scope = CancellationScope::new();
        let guard = DeadlineGuard::new(Duration::from_secs(5), &scope);
        let canceller = scope.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let outcome = guard
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(Reading::unavailable(Utc::now()))
            })
            .await;
        assert!(matches!(outcome, Outcome::Cancelled));
    }

    #[tokio::test]
    async fn test_already_cancelled_never_polls_fetch() {
        let scope = CancellationScope::new();
        scope.cancel();
        let polled = Arc::new(AtomicBool::new(false));
        let p = polled.clone();

        let outcome = DeadlineGuard::new(Duration::from_secs(1), &scope)
            .run(async move {
                p.store(true, Ordering::SeqCst);
                Ok(Reading::unavailable(Utc::now()))
            })
            .await;

        assert!(matches!(outcome, Outcome::Cancelled));
        assert!(!polled.load(Ordering::SeqCst));
    }
}
