// Path: crates/api/src/env.rs

use mint_types::app::Notice;
use std::time::{SystemTime, UNIX_EPOCH};

/// Surfaces user-interrupting notices (alerts, toasts, terminal lines).
pub trait Notifier: Send + Sync {
    /// Shows `notice` to the user.
    fn notify(&self, notice: &Notice);
}

/// A source of wall-clock time in whole seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    /// The current Unix time in seconds.
    fn now_unix_secs(&self) -> u64;
}

/// The system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
