//! Process-wide shutdown signal observed by every periodic task

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One cancellation signal shared by all loops (cheap to clone)
#[derive(Clone, Default)]
pub struct Shutdown {
    token: CancellationToken,
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every task to stop
    pub fn trigger(&self) {
        self.token.cancel();
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once shutdown has been triggered
    pub async fn triggered(&self) {
        self.token.cancelled().await
    }

    /// Sleep for `duration` unless shutdown comes first.
    ///
    /// Returns `false` if the sleep was cut short by shutdown.
    pub async fn sleep(&self, duration: Duration) -> bool {
        tokio::select! {
            _ = self.token.cancelled() => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sleep_completes_without_shutdown() {
        let shutdown = Shutdown::new();
        assert!(shutdown.sleep(Duration::from_secs(5)).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_interrupted_by_trigger() {
        let shutdown = Shutdown::new();
        let trigger = shutdown.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            trigger.trigger();
        });
        assert!(!shutdown.sleep(Duration::from_secs(3600)).await);
        assert!(shutdown.is_triggered());
    }
}
