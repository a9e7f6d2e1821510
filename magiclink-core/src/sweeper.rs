use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::DEFAULT_SWEEP_INTERVAL;
use crate::registry::Registry;

/// Background task that periodically evicts expired links
///
/// Sweeping only bounds memory held by links nobody looks up again;
/// [`Registry::lookup`] enforces expiry on its own.
///
/// # Example
///
/// ```rust,no_run
/// use magiclink_core::{Registry, Sweeper};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let registry = Registry::new();
///     let handle = Sweeper::new(registry.clone(), Duration::from_secs(600)).spawn();
///
///     // ... serve requests ...
///
///     handle.stop().await;
/// }
/// ```
pub struct Sweeper {
    registry: Registry,
    interval: Duration,
}

/// Handle to a running sweeper
///
/// Dropping the handle also stops the task.
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Sweeper {
    /// Creates a sweeper for `registry`
    ///
    /// A zero `interval` is replaced by [`DEFAULT_SWEEP_INTERVAL`].
    pub fn new(registry: Registry, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_SWEEP_INTERVAL
        } else {
            interval
        };
        Self { registry, interval }
    }

    /// Runs one pass and logs how many links it removed
    pub fn sweep_once(&self) -> usize {
        let removed = self.registry.sweep();
        if removed > 0 {
            tracing::info!(
                removed,
                remaining = self.registry.len(),
                "Swept expired links"
            );
        } else {
            tracing::debug!(
                remaining = self.registry.len(),
                "Sweep found no expired links"
            );
        }
        removed
    }

    /// Spawns the sweeper onto the current Tokio runtime
    ///
    /// The first pass runs one full interval after spawning.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime context.
    pub fn spawn(self) -> SweeperHandle {
        if tokio::runtime::Handle::try_current().is_err() {
            panic!(
                "magiclink_core::Sweeper requires a Tokio runtime. \
                 Call Sweeper::spawn() from within a #[tokio::main] or \
                 #[tokio::test] context."
            );
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));

        SweeperHandle { shutdown_tx, task }
    }

    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        tracing::info!("Expiry sweeper started, interval: {:?}", self.interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once();
                }
                changed = shutdown_rx.changed() => {
                    // An error means the handle was dropped
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Expiry sweeper stopped");
    }
}

impl SweeperHandle {
    /// Signals the sweeper to stop without waiting for it
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Signals the sweeper to stop and waits until it has exited
    pub async fn stop(self) {
        self.shutdown();
        if let Err(e) = self.task.await {
            tracing::warn!("Expiry sweeper task ended abnormally: {}", e);
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
