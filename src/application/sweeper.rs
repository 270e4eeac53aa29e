//! Background session sweeper.
//!
//! The store already sweeps lazily on every create. This task adds a
//! periodic pass so idle deployments also release expired sessions.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::ports::{SessionStore, SweepReport};

/// Periodically sweeps a session store.
pub struct SessionSweeper {
    store: Arc<dyn SessionStore>,
    interval: Duration,
}

impl SessionSweeper {
    pub fn new(store: Arc<dyn SessionStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Runs until `shutdown` turns true or its sender is dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::debug!("Session sweeper stopped");
                        return;
                    }
                }
                _ = ticker.tick() => {
                    self.sweep_once().await;
                }
            }
        }
    }

    /// Runs a single sweep pass.
    pub async fn sweep_once(&self) -> SweepReport {
        let report = self.store.sweep().await;
        if report.removed() > 0 {
            tracing::debug!(
                expired = report.expired,
                evicted = report.evicted_for_capacity,
                remaining = report.remaining,
                "Sessions swept"
            );
        }
        report
    }
}

/// Spawns a sweeper on the current runtime.
pub fn spawn_session_sweeper(
    store: Arc<dyn SessionStore>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let sweeper = SessionSweeper::new(store, interval);
    tokio::spawn(async move { sweeper.run(shutdown).await })
}
