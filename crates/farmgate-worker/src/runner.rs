//! Sweep runner — drives sweep tasks on periodic timers.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::task::SweepTask;

/// Owns the sweeper tasks and their shared cancellation channel.
///
/// Each spawned task runs until [`shutdown`](Self::shutdown), which
/// signals every task and awaits its completion, so tests and orderly
/// process exits never leave a sweeper mid-pass.
#[derive(Debug)]
pub struct SweepRunner {
    /// Cancellation signal shared by every spawned task.
    cancel: watch::Sender<bool>,
    /// Join handles of the spawned tasks.
    handles: Vec<JoinHandle<()>>,
}

impl SweepRunner {
    /// Create a runner with no tasks.
    pub fn new() -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            cancel,
            handles: Vec::new(),
        }
    }

    /// Spawn a sweep task onto the runtime.
    ///
    /// The first pass runs one full interval after the spawn, not
    /// immediately.
    pub fn spawn(&mut self, task: Arc<dyn SweepTask>) {
        let cancel = self.cancel.subscribe();
        self.handles.push(tokio::spawn(run_task(task, cancel)));
    }

    /// Number of tasks this runner has spawned.
    pub fn task_count(&self) -> usize {
        self.handles.len()
    }

    /// Signal every task to stop and wait for them to finish.
    pub async fn shutdown(self) {
        let _ = self.cancel.send(true);
        for handle in self.handles {
            let _ = handle.await;
        }
        info!("All sweepers stopped");
    }
}

impl Default for SweepRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive one task until the cancel signal flips.
async fn run_task(task: Arc<dyn SweepTask>, mut cancel: watch::Receiver<bool>) {
    let mut ticker = time::interval(task.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first interval tick completes immediately; consume it so the
    // first sweep waits a full period.
    ticker.tick().await;

    info!(task = task.name(), interval = ?task.interval(), "Sweeper started");

    loop {
        tokio::select! {
            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                match task.sweep().await {
                    Ok(removed) if removed > 0 => {
                        debug!(task = task.name(), removed, "Sweep pass complete");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!(task = task.name(), error = %e, "Sweep pass failed");
                    }
                }
            }
        }
    }

    info!(task = task.name(), "Sweeper stopped");
}
