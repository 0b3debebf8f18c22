mod cli;
mod engine;
mod model;
#[cfg(feature = "tui")]
mod orchestrator;
mod picker;
#[cfg(feature = "tui")]
mod preview;
mod summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_non_tui = args.json || args.text;
    init_tracing(is_non_tui);

    match cli::run(args).await {
        Ok(()) => {
            // Explicitly exit with code 0 on success, especially for non-TUI modes
            if is_non_tui {
                std::process::exit(0);
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Tracing goes to stderr only. The TUI owns the terminal, so its
/// default filter is off unless RUST_LOG asks for output.
fn init_tracing(non_tui: bool) {
    let default_filter = if non_tui { "breedscan=warn" } else { "off" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
