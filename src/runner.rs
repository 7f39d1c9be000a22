//! Background task driving the collector's periodic callbacks.
//!
//! A single tokio task owns both cadences: the ~1 Hz file-readiness check and
//! the per-tick drain step. Putting them in one `select!` loop makes their
//! coordination explicit and guarantees the shutdown flush never overlaps a
//! periodic drain.

use crate::collector::LogCollector;
use crate::config::CollectorConfig;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// Handle to a running collector task.
///
/// Dropping the handle stops the loop and runs the final flush, but gives no
/// way to await it; call [`shutdown`] to wait for the queue to drain.
///
/// [`shutdown`]: CollectorHandle::shutdown
pub struct CollectorHandle {
    stop_tx: mpsc::Sender<oneshot::Sender<usize>>,
    task: tokio::task::JoinHandle<()>,
}

impl CollectorHandle {
    /// Stops the periodic loop and force-flushes every queued record.
    ///
    /// Returns the number of records written by the final flush. The flush
    /// runs inside the collector task itself, after the last periodic drain,
    /// so no drain can execute concurrently with it.
    pub async fn shutdown(self) -> usize {
        let (done_tx, done_rx) = oneshot::channel();
        if self.stop_tx.send(done_tx).await.is_err() {
            // Task already gone; nothing left to flush.
            return 0;
        }
        let written = done_rx.await.unwrap_or(0);
        let _ = self.task.await;
        written
    }
}

/// Spawns the collector task.
///
/// The task fires the readiness check once immediately, then on its configured
/// interval, and runs one drain step per drain tick. Errors from either
/// callback are reported and the loop continues; the record that failed to
/// drain stays queued for the next tick.
pub fn spawn(collector: Arc<LogCollector>, config: &CollectorConfig) -> CollectorHandle {
    let (stop_tx, mut stop_rx) = mpsc::channel::<oneshot::Sender<usize>>(1);
    let readiness_interval = config.readiness_interval();
    let drain_interval = config.drain_interval();

    let task = tokio::spawn(async move {
        let mut readiness = tokio::time::interval(readiness_interval);
        let mut drain = tokio::time::interval(drain_interval);

        loop {
            tokio::select! {
                _ = readiness.tick() => {
                    if let Err(e) = collector.check_file_readiness() {
                        tracing::warn!(error = %e, "log file readiness check failed");
                    }
                }
                _ = drain.tick() => {
                    if let Err(e) = collector.drain_one() {
                        tracing::warn!(error = %e, "log drain failed, will retry");
                    }
                }
                stopped = stop_rx.recv() => {
                    // None means the handle was dropped; flush regardless.
                    let written = collector.flush_remaining();
                    if let Some(done_tx) = stopped {
                        let _ = done_tx.send(written);
                    }
                    break;
                }
            }
        }
    });

    CollectorHandle { stop_tx, task }
}

#[cfg(test)]
#[path = "tests/runner_tests.rs"]
mod tests;
