use crate::config::{ConfigError, Deployment, TrackerConfig};
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay token transfers and report total and circulating supply
#[derive(Parser, Debug)]
#[command(name = "token-supply-tracker")]
#[command(about = "Replay token transfers and report total and circulating supply", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing transfer records
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy to use for replaying transfers
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Compiled-in deployment to track
    #[arg(
        long = "deployment",
        value_name = "NAME",
        conflicts_with = "config",
        help = "Built-in deployment to track (default: mainnet)"
    )]
    pub deployment: Option<Preset>,

    /// TOML file describing the deployments to track
    #[arg(
        long = "config",
        value_name = "FILE",
        help = "TOML deployment configuration file"
    )]
    pub config: Option<PathBuf>,

    /// Where to write per-holder balances
    #[arg(
        long = "holders",
        value_name = "PATH",
        help = "Also write token,id,balance rows to this file"
    )]
    pub holders: Option<PathBuf>,

    /// Number of transfers per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of transfers per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,
}

/// Available processing strategies for CSV replay
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Compiled-in deployments
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Ethereum mainnet token with its explicit non-circulating set
    Mainnet,
    /// Gnosis Chain token with its vesting contract
    GnosisChain,
}

impl Preset {
    pub fn config(self) -> TrackerConfig {
        match self {
            Preset::Mainnet => TrackerConfig::mainnet(),
            Preset::GnosisChain => TrackerConfig::gnosis_chain(),
        }
    }
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; zero values are replaced by
    /// the defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Resolve the deployments to track
    ///
    /// `--config` wins when given; otherwise the `--deployment` preset, which
    /// defaults to mainnet.
    pub fn load_deployments(&self) -> Result<Vec<Deployment>, ConfigError> {
        match &self.config {
            Some(path) => TrackerConfig::load_file(path),
            None => self.deployment.unwrap_or(Preset::Mainnet).config().resolve(),
        }
    }
}
