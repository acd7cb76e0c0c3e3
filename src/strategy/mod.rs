//! Processing strategy module for transfer replay
//!
//! This module defines the Strategy pattern for complete replay pipelines,
//! encompassing both CSV parsing and supply accounting. This allows different
//! processing implementations (synchronous, asynchronous batch) to be selected at runtime.

use crate::cli::StrategyType;
use crate::config::Deployment;
use crate::io::csv_format::{write_holders_csv, write_supply_csv};
use crate::types::{SupplyError, TokenState};
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete replay pipelines
///
/// Each strategy reads transfer records from a CSV file, applies them to one
/// processor per configured deployment, and reports the final per-token state.
pub trait ProcessingStrategy: Send + Sync {
    /// Replay every transfer in the input file
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<TokenState>)` - Final state of every configured token, sorted
    ///   by token id
    /// * `Err(String)` - A fatal error occurred
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened (file not found, permission denied)
    /// - A holder or supply write fails
    ///
    /// Malformed rows and per-event rejections (bad address, negative amount,
    /// unknown token) are logged and skipped; they never fail the replay.
    fn replay(&self, input_path: &Path) -> Result<Vec<TokenState>, String>;

    /// Replay the input and write supply rows (and optionally holder rows)
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the input CSV file containing transfer records
    /// * `output` - Writer receiving `id,total,circulating`
    /// * `holders` - Optional writer receiving `token,id,balance`
    fn process(
        &self,
        input_path: &Path,
        output: &mut dyn Write,
        holders: Option<&mut dyn Write>,
    ) -> Result<(), String> {
        let states = self.replay(input_path)?;

        write_supply_csv(&states, output)?;
        if let Some(holders) = holders {
            write_holders_csv(&states, holders)?;
        }

        Ok(())
    }
}

/// Decide what a failed transfer means for the replay
///
/// Per-event rejections are logged and the replay continues; anything else
/// (a store failure) becomes the fatal error that aborts it.
pub(crate) fn handle_transfer_error(error: SupplyError) -> Result<(), String> {
    if error.is_malformed_event() {
        tracing::warn!("Skipping transfer: {}", error);
        Ok(())
    } else {
        tracing::error!("Aborting replay: {}", error);
        Err(error.to_string())
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `deployments` - Tokens to track; every strategy builds its own processors
/// * `config` - Optional configuration for async batch processing (ignored for sync)
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    deployments: Vec<Deployment>,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(deployments)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(deployments, config))
        }
    }
}
