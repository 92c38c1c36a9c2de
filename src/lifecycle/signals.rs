//! OS signal handling.
//!
//! Ctrl-C (and SIGTERM on unix) cancels the process-level scope so every
//! in-flight fetch is abandoned and no further state is mutated.

use crate::lifecycle::CancellationScope;

/// Wait for a termination signal, then cancel `scope`.
pub async fn cancel_on_signal(scope: CancellationScope) {
    tokio::select! {
        _ = terminate() => {
            tracing::info!(scope_id = %scope.id(), "Termination signal received");
            scope.cancel();
        }
        _ = scope.cancelled() => {}
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install SIGTERM handler, using Ctrl-C only");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn terminate() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_returns_when_scope_cancelled_elsewhere() {
        let scope = CancellationScope::new();
        let handle = tokio::spawn(cancel_on_signal(scope.clone()));
        scope.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("signal listener kept running after cancel")
            .unwrap();
    }
}
