//! Batch processing with token-based sharding
//!
//! This module provides the `ShardRouter`, which processes batches of transfer
//! records concurrently across tokens while keeping every token's transfers
//! strictly in input order.
//!
//! # Design
//!
//! Each configured token is a shard: one `TransferProcessor` stored in a
//! `DashMap` under the token's routing key. A batch is partitioned by token,
//! and each partition runs on its own tokio task that holds the shard's entry
//! lock for the whole partition. Two partitions never share a token, so tasks
//! never contend; batches themselves are awaited one after another by the
//! caller.
//!
//! # Architecture
//!
//! ```text
//! ShardRouter
//!     └── Arc<DashMap<token key, TransferProcessor>>  (one shard per token)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::JoinHandle;

use crate::config::Deployment;
use crate::core::router::{token_key, DeploymentProcessor};
use crate::types::{SupplyError, TokenState, TransferOutcome, TransferRecord};

/// Result of processing a single transfer record
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The record that was processed
    pub record: TransferRecord,

    /// The outcome of processing (success or error)
    pub result: Result<TransferOutcome, SupplyError>,
}

/// Concurrent router with one shard per token
///
/// Cloning is cheap and shares the shards.
#[derive(Debug, Clone)]
pub struct ShardRouter {
    shards: Arc<DashMap<String, DeploymentProcessor>>,
}

impl ShardRouter {
    /// Build one empty shard per deployment
    pub fn new(deployments: &[Deployment]) -> Self {
        let shards = DashMap::new();
        for deployment in deployments {
            shards.insert(token_key(deployment.token.as_str()), deployment.processor());
        }

        Self {
            shards: Arc::new(shards),
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Partition a batch of records by token routing key
    ///
    /// # Guarantees
    ///
    /// - Each record appears in exactly one partition
    /// - Records for each token keep their original order
    pub fn partition_by_token(
        &self,
        batch: Vec<TransferRecord>,
    ) -> HashMap<String, Vec<TransferRecord>> {
        let mut token_batches: HashMap<String, Vec<TransferRecord>> = HashMap::new();

        for record in batch {
            token_batches
                .entry(token_key(&record.token))
                .or_default()
                .push(record);
        }

        token_batches
    }

    /// Process all records of one token sequentially
    ///
    /// The shard stays locked for the whole partition. Records for a token
    /// with no shard each yield `SupplyError::UnknownToken`. A store failure
    /// does not stop the partition; it is reported in that record's result
    /// and the caller decides whether to abort.
    pub async fn process_token_transfers(
        &self,
        key: &str,
        transfers: Vec<TransferRecord>,
    ) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(transfers.len());

        match self.shards.get_mut(key) {
            Some(mut shard) => {
                for record in transfers {
                    let result = shard.process(&record.event);
                    results.push(ProcessingResult { record, result });
                }
            }
            None => {
                for record in transfers {
                    let result = Err(SupplyError::unknown_token(&record.token));
                    results.push(ProcessingResult { record, result });
                }
            }
        }

        results
    }

    /// Process a batch with token-based partitioning
    ///
    /// 1. Partition the batch by token
    /// 2. Spawn a tokio task per token partition
    /// 3. Wait for all tasks and collect their results
    ///
    /// Results are grouped by token; within a token they follow input order.
    ///
    /// # Errors
    ///
    /// Returns an error if a partition task panicked or was cancelled. Its
    /// shard may be partially updated, so the replay cannot continue.
    pub async fn process_batch(
        &self,
        batch: Vec<TransferRecord>,
    ) -> Result<Vec<ProcessingResult>, String> {
        let token_batches = self.partition_by_token(batch);

        let mut tasks = Vec::with_capacity(token_batches.len());
        for (key, transfers) in token_batches {
            let router = self.clone();
            tasks.push(tokio::spawn(async move {
                router.process_token_transfers(&key, transfers).await
            }));
        }

        join_partitions(tasks).await
    }

    /// Final state of every shard, sorted by token identity
    pub fn states(&self) -> Result<Vec<TokenState>, SupplyError> {
        let mut states = Vec::with_capacity(self.shards.len());
        for shard in self.shards.iter() {
            states.push(shard.value().state()?);
        }
        states.sort_by(|a, b| a.supply.id.cmp(&b.supply.id));
        Ok(states)
    }
}

/// Await every partition task; the first failed task fails the batch
async fn join_partitions(
    tasks: Vec<JoinHandle<Vec<ProcessingResult>>>,
) -> Result<Vec<ProcessingResult>, String> {
    let mut results = Vec::new();
    for task in tasks {
        match task.await {
            Ok(token_results) => results.extend(token_results),
            Err(e) => {
                tracing::error!(error = %e, "Shard task failed");
                return Err(format!("Shard task failed: {}", e));
            }
        }
    }
    Ok(results)
}
