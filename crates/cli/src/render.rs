// Path: crates/cli/src/render.rs
//! Plain-text rendering of session views and notices.

use mint_api::Notifier;
use mint_types::{app::Notice, view::SessionView};

/// Renders one view: the banner if the phase has one, the single
/// affordance, then the owner and minted-count lines once connected.
pub fn render(view: &SessionView, collection_name: &str) -> String {
    let affordance = view.affordance();
    let mut lines = Vec::new();
    if let Some(banner) = affordance.banner(collection_name) {
        lines.push(banner);
    }
    match affordance.action() {
        Some(_) => lines.push(format!("[ {} ]", affordance.label())),
        None if view.busy => lines.push(format!("[ {} ]", affordance.label())),
        None => lines.push(affordance.label().to_string()),
    }
    if view.connected {
        if let Some(owner) = view.owner {
            lines.push(format!("Owner: {}", owner));
        }
        lines.push(view.minted_line());
    }
    lines.join("\n")
}

/// Prints notices to stdout, where the rendered views go.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: &Notice) {
        tracing::info!(target: "cli", event = "notice", notice = %notice);
        println!("*** {} ***", notice);
    }
}
