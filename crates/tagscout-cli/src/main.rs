//! Tagscout CLI - resolves the latest tag of a container registry repository.
//!
//! The result is written to stdout as one JSON object; logs go to stderr.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tagscout=info,tagscout_registry=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version text go to stdout, argument errors to stderr.
            let _ = err.print();
            std::process::exit(cli::exit_code(&err));
        }
    };
    cli::run(&cli)
}
