// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling the controller from the backend.

use once_cell::sync::OnceCell;

/// A no-op sink for use in tests or when metrics are disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns the configured error metrics sink, or a no-op sink if none is installed.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns the configured sale metrics sink, or a no-op sink if none is installed.
pub fn sale_metrics() -> &'static dyn SaleMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// A sink for metrics about the sale session: polling, phases and writes.
pub trait SaleMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the counter of poll ticks that ran.
    fn inc_poll_ticks(&self);
    /// Sets the phase gauge vector so only `phase` reads 1.
    fn set_phase(&self, phase: &'static str);
    /// Increments the counter of finished writes, labeled by method and outcome.
    fn inc_writes(&self, method: &'static str, outcome: &'static str);
}
impl SaleMetricsSink for NopSink {
    fn inc_poll_ticks(&self) {}
    fn set_phase(&self, _phase: &'static str) {}
    fn inc_writes(&self, _method: &'static str, _outcome: &'static str) {}
}

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by its kind and code.
    fn inc_error(&self, kind: &'static str, code: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _code: &'static str) {}
}

/// A unified sink implementing every domain trait, so a backend like
/// Prometheus is installed once.
pub trait MetricsSink: SaleMetricsSink + ErrorMetricsSink {}

impl<T> MetricsSink for T where T: SaleMetricsSink + ErrorMetricsSink {}
