//! Token Supply Tracker CLI
//!
//! Replays token transfer events from a CSV file and reports total and
//! circulating supply per token.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- transfers.csv > supply.csv
//! cargo run -- --strategy sync --deployment gnosis-chain transfers.csv > supply.csv
//! cargo run -- --config tracker.toml --holders holders.csv transfers.csv > supply.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 transfers.csv > supply.csv
//! ```
//!
//! Supply rows go to stdout; logs go to stderr and are filtered with
//! `RUST_LOG` (default `info`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (bad configuration, file not found, store failure, etc.)

use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;
use token_supply_tracker::cli;
use token_supply_tracker::strategy;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(args: cli::CliArgs) -> Result<(), String> {
    let deployments = args.load_deployments().map_err(|e| e.to_string())?;
    tracing::debug!(count = deployments.len(), "Deployments loaded");

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), deployments, config)
    };

    let mut holders = match &args.holders {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                format!("Failed to create holders file '{}': {}", path.display(), e)
            })?;
            Some(BufWriter::new(file))
        }
        None => None,
    };

    let mut output = std::io::stdout();
    strategy.process(
        &args.input_file,
        &mut output,
        holders.as_mut().map(|writer| writer as &mut dyn Write),
    )?;

    if let Some(writer) = holders.as_mut() {
        writer
            .flush()
            .map_err(|e| format!("Failed to flush holders file: {}", e))?;
    }

    Ok(())
}

fn main() {
    init_logging();

    let args = cli::parse_args();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
