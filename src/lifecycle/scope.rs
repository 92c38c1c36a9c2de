//! Per-consumer cancellation scope.

use tokio_util::sync::{CancellationToken, DropGuard};
use uuid::Uuid;

/// Cancellation boundary for one consumer's lifetime.
///
/// Cloning shares the same underlying state; every clone observes the same
/// Active → Cancelled transition, which happens at most once.
#[derive(Debug, Clone)]
pub struct CancellationScope {
    id: Uuid,
    token: CancellationToken,
}

impl CancellationScope {
    /// Create a new, active scope.
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(scope_id = %id, "Cancellation scope created");
        Self {
            id,
            token: CancellationToken::new(),
        }
    }

    /// Identifier used to correlate log events.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Cancel the scope. Idempotent and irreversible.
    pub fn cancel(&self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        tracing::info!(scope_id = %self.id, "Cancellation scope cancelled");
    }

    /// True until `cancel()` has been called on any clone.
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Resolves once the scope is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Token handed to work dispatched under this scope.
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Guard that cancels the scope when dropped, tying it to the consumer's lifetime.
    pub fn cancel_on_drop(&self) -> DropGuard {
        self.token.clone().drop_guard()
    }
}

impl Default for CancellationScope {
    fn default() -> Self {
        Self::new()
    }
}
