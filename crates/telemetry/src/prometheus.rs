// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    register_gauge_vec, register_int_counter, register_int_counter_vec, Encoder, GaugeVec,
    IntCounter, IntCounterVec, TextEncoder,
};

static POLL_TICKS_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static PHASE: OnceCell<GaugeVec> = OnceCell::new();
static WRITES_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

/// Label values of the `mint_phase` gauge, one per sale phase.
pub const PHASE_LABELS: [&str; 6] = [
    "not_connected",
    "loading",
    "owner_can_start",
    "waiting_for_start",
    "presale_open",
    "public_open",
];

#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

impl SaleMetricsSink for PrometheusSink {
    fn inc_poll_ticks(&self) {
        if let Some(c) = POLL_TICKS_TOTAL.get() {
            c.inc();
        }
    }
    fn set_phase(&self, phase: &'static str) {
        if let Some(g) = PHASE.get() {
            for p in PHASE_LABELS {
                g.with_label_values(&[p])
                    .set(if p == phase { 1.0 } else { 0.0 });
            }
        }
    }
    fn inc_writes(&self, method: &'static str, outcome: &'static str) {
        if let Some(c) = WRITES_TOTAL.get() {
            c.with_label_values(&[method, outcome]).inc();
        }
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, code: &'static str) {
        if let Some(c) = ERRORS_TOTAL.get() {
            c.with_label_values(&[kind, code]).inc();
        }
    }
}

fn set_once<T>(cell: &OnceCell<T>, value: T) -> Result<(), prometheus::Error> {
    cell.set(value)
        .map_err(|_| prometheus::Error::Msg("metrics already installed".into()))
}

/// Registers all collectors with the default registry and installs the
/// sink globally. Call once at startup.
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    set_once(
        &POLL_TICKS_TOTAL,
        register_int_counter!(
            "mint_poll_ticks_total",
            "Total number of sale-phase poll ticks that ran."
        )?,
    )?;
    set_once(
        &PHASE,
        register_gauge_vec!(
            "mint_phase",
            "Current sale phase (1 if active, 0 otherwise).",
            &["phase"]
        )?,
    )?;
    set_once(
        &WRITES_TOTAL,
        register_int_counter_vec!(
            "mint_writes_total",
            "Total finished write transactions.",
            &["method", "outcome"]
        )?,
    )?;
    set_once(
        &ERRORS_TOTAL,
        register_int_counter_vec!(
            "mint_errors_total",
            "Total number of errors, categorized by kind and code.",
            &["kind", "code"]
        )?,
    )?;

    static PROMETHEUS_SINK: PrometheusSink = PrometheusSink;
    SINK.set(&PROMETHEUS_SINK)
        .map_err(|_| prometheus::Error::Msg("metrics sink already installed".into()))?;
    Ok(&PROMETHEUS_SINK)
}

/// Encodes the default registry in the Prometheus text exposition format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buf) {
        tracing::error!(target: "telemetry", error = %e, "Failed to encode prometheus metrics");
    }
    String::from_utf8_lossy(&buf).into_owned()
}
