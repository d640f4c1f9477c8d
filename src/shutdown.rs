use futures::future;
use tokio::select;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

/// Parent lifetime of a run, ended by SIGINT or SIGTERM.
pub struct Shutdown {
    rx: watch::Receiver<Option<&'static str>>,
}

/// Ends a [`Shutdown`] by hand.
#[cfg(test)]
pub struct ShutdownTrigger {
    tx: watch::Sender<Option<&'static str>>,
}

impl Shutdown {
    /// Listens for process signals. Must be called inside a tokio runtime.
    pub fn new() -> Self {
        Self {
            rx: spawn_shutdown_listener(),
        }
    }

    #[cfg(test)]
    pub fn manual() -> (ShutdownTrigger, Self) {
        let (tx, rx) = watch::channel(None);
        (ShutdownTrigger { tx }, Self { rx })
    }

    pub fn requested(&self) -> Option<&'static str> {
        *self.rx.borrow()
    }

    /// Resolves with the signal name once shutdown is requested.
    ///
    /// Never resolves if the sender goes away without requesting shutdown.
    pub async fn requested_signal(&mut self) -> &'static str {
        loop {
            if let Some(signal) = *self.rx.borrow_and_update() {
                return signal;
            }
            if self.rx.changed().await.is_err() {
                return future::pending().await;
            }
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl ShutdownTrigger {
    pub fn trigger(&self, signal: &'static str) {
        let _ = self.tx.send(Some(signal));
    }
}

fn spawn_shutdown_listener() -> watch::Receiver<Option<&'static str>> {
    let (shutdown_tx, shutdown_rx) = watch::channel(None);

    tokio::spawn(async move {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).ok();

        let term_future = async {
            if let Some(ref mut sigterm) = sigterm {
                sigterm.recv().await;
                Some("SIGTERM")
            } else {
                future::pending::<Option<&'static str>>().await
            }
        };

        select! {
            res = signal::ctrl_c() => {
                if res.is_ok() {
                    info!("Received SIGINT.");
                    let _ = shutdown_tx.send(Some("SIGINT"));
                } else {
                    warn!("Failed to listen for SIGINT: {:?}", res.err());
                }
            }
            _ = term_future => {
                info!("Received SIGTERM.");
                let _ = shutdown_tx.send(Some("SIGTERM"));
            }
        }

        // Keep the sender alive so waiters never see a closed channel.
        shutdown_tx.closed().await;
    });

    shutdown_rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_manual_trigger() {
        let (trigger, mut shutdown) = Shutdown::manual();
        assert_eq!(shutdown.requested(), None);

        trigger.trigger("SIGTERM");

        assert_eq!(shutdown.requested(), Some("SIGTERM"));
        assert_eq!(shutdown.requested_signal().await, "SIGTERM");
    }

    #[tokio::test]
    async fn test_dropped_trigger_never_resolves() {
        let (trigger, mut shutdown) = Shutdown::manual();
        drop(trigger);

        let res = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            shutdown.requested_signal(),
        )
        .await;
        assert!(res.is_err());
    }
}
