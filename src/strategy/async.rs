//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. It processes transfers in batches, running the
//! tokens of each batch in parallel.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── ShardRouter (token partitioning + one DashMap shard per token)
//! ```
//!
//! # Ordering
//!
//! - Batches are processed one after another, so a token's transfers keep
//!   file order even when they span several batches
//! - Within a batch, partitions for different tokens run on separate tasks
//! - Worker threads come from a tokio multi-threaded runtime

use crate::config::Deployment;
use crate::core::r#async::ShardRouter;
use crate::io::async_reader::AsyncReader;
use crate::strategy::{handle_transfer_error, ProcessingStrategy};
use crate::types::{SupplyError, TokenState};
use std::path::Path;

/// Configuration for batch processing
///
/// Controls how transfers are batched and the number of worker threads
/// for parallel processing within each batch.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of transfers per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches,
                default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Transfers are read in batches and applied batch by batch. Within each batch,
/// transfers are partitioned by token and the partitions run in parallel.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    deployments: Vec<Deployment>,

    /// Batch processing configuration
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(deployments: Vec<Deployment>, config: BatchConfig) -> Self {
        Self {
            deployments,
            config,
        }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Replay transfers batch by batch
    ///
    /// 1. Builds a ShardRouter with one shard per configured deployment
    /// 2. Creates a tokio multi-threaded runtime
    /// 3. Reads transfers in batches from CSV using AsyncReader
    /// 4. Processes each batch to completion before reading the next
    /// 5. Aborts on the first store failure or failed shard task; skips
    ///    per-event rejections
    /// 6. Collects the final per-token state
    fn replay(&self, input_path: &Path) -> Result<Vec<TokenState>, String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let router = ShardRouter::new(&self.deployments);

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| SupplyError::file_open(input_path, e).to_string())?;

            // csv-async reads through the futures-io traits
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);

            let mut reader = AsyncReader::new(compat_file);

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;

                if batch.is_empty() {
                    break;
                }

                for processed in router.process_batch(batch).await? {
                    if let Err(e) = processed.result {
                        handle_transfer_error(e)?;
                    }
                }
            }

            router.states().map_err(|e| e.to_string())
        })
    }
}
