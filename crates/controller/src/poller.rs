// Path: crates/controller/src/poller.rs
//! A fixed-period re-evaluation loop.
//!
//! The loop runs on its own task and holds only a weak reference to its
//! target, so dropping the target ends the loop at the next tick. Ticks
//! run inline in the loop body: a slow tick delays the next one instead of
//! overlapping it, and ticks that fall due meanwhile are skipped: the next
//! one fires a full period after the slow tick returns.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// What a tick asks of the loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollStep {
    Continue,
    /// The target reached a state polling cannot change; stop for good.
    Terminal,
}

/// Why the loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollExit {
    Terminal,
    Stopped,
    Dropped,
}

#[async_trait]
pub trait PollTarget: Send + Sync + 'static {
    async fn tick(&self) -> PollStep;

    /// Runs once after a tick returns `Terminal`, before the loop exits.
    async fn finish(&self) {}
}

pub struct Poller;

impl Poller {
    /// Spawns the loop. The first tick fires one `period` after the call.
    pub fn spawn<T: PollTarget>(target: Weak<T>, period: Duration) -> PollerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = ticks.clone();

        let task = tokio::spawn(async move {
            tracing::info!(
                target: "poller",
                event = "started",
                period_ms = period.as_millis() as u64
            );
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            let exit = loop {
                tokio::select! {
                    biased;
                    changed = shutdown_rx.changed() => {
                        // A dropped handle counts as a stop request.
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break PollExit::Stopped;
                        }
                    }
                    _ = ticker.tick() => {
                        let Some(target) = target.upgrade() else {
                            break PollExit::Dropped;
                        };
                        let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                        tracing::debug!(target: "poller", event = "tick", n);
                        let started = Instant::now();
                        if target.tick().await == PollStep::Terminal {
                            target.finish().await;
                            break PollExit::Terminal;
                        }
                        // Ticks that came due while this one ran are dropped,
                        // not fired late.
                        if started.elapsed() > period {
                            tracing::debug!(target: "poller", event = "skipped", n);
                            ticker.reset();
                        }
                    }
                }
            };
            tracing::info!(target: "poller", event = "stopped", exit = ?exit);
            exit
        });

        PollerHandle {
            shutdown: shutdown_tx,
            task,
            ticks,
        }
    }
}

#[derive(Debug)]
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<PollExit>,
    ticks: Arc<AtomicU64>,
}

impl PollerHandle {
    /// Requests a stop. A tick already running completes first.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Ticks started so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub async fn join(self) -> PollExit {
        match self.task.await {
            Ok(exit) => exit,
            Err(e) => {
                tracing::warn!(target: "poller", event = "join_failed", error = %e);
                PollExit::Stopped
            }
        }
    }
}
