//! Graceful shutdown signal for accept loops and their sessions

use tokio::sync::watch;

/// Owned by whoever may stop the servers (the daemon's ctrl-c path)
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

/// Observed by accept loops and per-connection workers
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

/// Create a linked handle/signal pair
pub fn channel() -> (ShutdownHandle, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, Shutdown { rx })
}

impl ShutdownHandle {
    /// Ask every listener of this signal to stop
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: self.tx.subscribe(),
        }
    }
}

impl Shutdown {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once shutdown is triggered
    ///
    /// Dropping the handle without triggering it does not count; in that case
    /// this never resolves.
    pub async fn wait(&mut self) {
        if self.rx.wait_for(|triggered| *triggered).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_wakes_all_clones() {
        let (handle, shutdown) = channel();
        let mut first = shutdown.clone();
        let mut second = handle.subscribe();

        assert!(!shutdown.is_triggered());
        handle.trigger();

        first.wait().await;
        second.wait().await;
        assert!(shutdown.is_triggered());
    }

    #[tokio::test]
    async fn test_dropped_handle_does_not_trigger() {
        let (handle, mut shutdown) = channel();
        drop(handle);

        let waited = tokio::time::timeout(Duration::from_millis(50), shutdown.wait()).await;
        assert!(waited.is_err());
    }
}
