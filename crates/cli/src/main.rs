// Path: crates/cli/src/main.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mint_api::SystemClock;
use mint_client::evm::EvmConnector;
use mint_controller::SaleController;
use mint_types::{app::WriteKind, config::SaleConfig};
use render::{render, TerminalNotifier};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[clap(name = "mint", about = "Whitelist presale client for an NFT sale contract")]
struct MintOpts {
    #[clap(long, default_value = "mint.toml")]
    config: PathBuf,
    #[clap(long, env = "MINT_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,
    #[clap(
        long,
        env = "MINT_RPC_URL",
        help = "Overrides rpc_url in the config file"
    )]
    rpc_url: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect and follow the sale until public mint opens or Ctrl-C.
    Watch,
    /// Connect, read once and print the current view.
    Status {
        /// Also print the Prometheus text exposition.
        #[clap(long)]
        metrics: bool,
        /// Print the view as JSON instead of text.
        #[clap(long)]
        json: bool,
    },
    /// Owner only: open the presale.
    StartPresale,
    /// Mint during the presale.
    PresaleMint,
    /// Mint once the presale has ended.
    PublicMint,
}

#[tokio::main]
async fn main() -> Result<()> {
    mint_telemetry::init::init_tracing()?;
    let opts = MintOpts::parse();

    let mut config = SaleConfig::load(&opts.config)
        .with_context(|| format!("loading {}", opts.config.display()))?;
    if let Some(url) = opts.rpc_url {
        config.rpc_url = url;
    }
    if matches!(opts.command, Command::Status { metrics: true, .. }) {
        mint_telemetry::prometheus::install()?;
    }
    tracing::info!(
        target: "cli",
        event = "startup",
        rpc_url = %config.rpc_url,
        contract = %config.contract_address,
        chain_id = %config.expected_chain_id
    );

    let collection = config.collection_name.clone();
    let connector = EvmConnector::new(config.rpc_url.clone(), &opts.private_key)?;
    let controller = SaleController::new(
        config,
        Arc::new(connector),
        Arc::new(TerminalNotifier),
        Arc::new(SystemClock),
    )?;
    let view = controller.connect().await?;

    match opts.command {
        Command::Watch => watch(&controller, &collection).await,
        Command::Status { metrics, json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("{}", render(&view, &collection));
            }
            if metrics {
                print!("{}", mint_telemetry::prometheus::render());
            }
        }
        Command::StartPresale => write(&controller, WriteKind::StartPresale, &collection).await?,
        Command::PresaleMint => write(&controller, WriteKind::PresaleMint, &collection).await?,
        Command::PublicMint => write(&controller, WriteKind::PublicMint, &collection).await?,
    }

    if let Some(poller) = controller.stop_polling() {
        poller.join().await;
    }
    Ok(())
}

async fn write(controller: &SaleController, kind: WriteKind, collection: &str) -> Result<()> {
    let receipt = controller.write(kind).await?;
    println!(
        "{} confirmed: {} (block {})",
        kind,
        receipt.tx_hash,
        receipt
            .block_number
            .map_or_else(|| "pending".to_string(), |n| n.to_string())
    );
    println!("{}", render(&controller.view(), collection));
    Ok(())
}

async fn watch(controller: &SaleController, collection: &str) {
    let mut rx = controller.subscribe();
    let first = rx.borrow_and_update().view();
    println!("{}\n", render(&first, collection));
    if first.phase.is_terminal() {
        return;
    }
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = rx.borrow_and_update().view();
                println!("{}\n", render(&view, collection));
                if view.phase.is_terminal() {
                    tracing::info!(target: "cli", event = "shutdown", reason = "public_mint_live");
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!(target: "cli", event = "shutdown", reason = "ctrl-c");
                break;
            }
        }
    }
}
