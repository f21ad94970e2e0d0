// Path: crates/telemetry/src/init.rs
use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    EnvFilter, Registry,
};

/// Directives used when `RUST_LOG` is unset. The RPC stack is chatty at
/// `info` and would drown the sale events.
pub const DEFAULT_FILTER: &str =
    "info,alloy_rpc_client=warn,alloy_transport_http=warn,hyper_util=warn,reqwest=warn";

/// Installs the global subscriber: one flattened JSON object per event on
/// stderr, leaving stdout to the rendered views. `log` records from
/// dependencies are bridged in.
pub fn init_tracing() -> Result<(), anyhow::Error> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(DEFAULT_FILTER)?,
    };
    let fmt_layer = fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(UtcTime::rfc_3339());
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(Registry::default().with(filter).with(fmt_layer))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }
}
