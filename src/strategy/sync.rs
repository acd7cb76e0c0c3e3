//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates replay by coordinating between the
//! SyncReader (for CSV input) and the TokenRouter (for supply accounting).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Supply accounting to `TokenRouter` (one processor per token)
//! - CSV output to the `csv_format` writers (via `ProcessingStrategy::process`)
//!
//! # Memory Efficiency
//!
//! Records are streamed one at a time. Memory usage is O(holders), not
//! O(transfers).

use crate::config::Deployment;
use crate::core::TokenRouter;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{handle_transfer_error, ProcessingStrategy};
use crate::types::TokenState;
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use token_supply_tracker::config::TrackerConfig;
/// use token_supply_tracker::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let deployments = TrackerConfig::mainnet().resolve().unwrap();
/// let strategy = SyncProcessingStrategy::new(deployments);
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("transfers.csv"), &mut output, None)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    deployments: Vec<Deployment>,
}

impl SyncProcessingStrategy {
    pub fn new(deployments: Vec<Deployment>) -> Self {
        Self { deployments }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Replay transfers one record at a time
    ///
    /// 1. Creates a SyncReader to stream transfer records from the CSV file
    /// 2. Builds a fresh TokenRouter from the configured deployments
    /// 3. Routes each record to its token's processor, in file order
    /// 4. Collects the final per-token state
    fn replay(&self, input_path: &Path) -> Result<Vec<TokenState>, String> {
        let mut router = TokenRouter::new(&self.deployments);

        let mut reader = SyncReader::new(input_path).map_err(|e| e.to_string())?;

        while let Some(result) = reader.next() {
            match result {
                Ok(record) => {
                    if let Err(e) = router.route(&record) {
                        handle_transfer_error(e)?;
                    }
                }
                Err(e) => {
                    tracing::warn!(line = reader.line(), "Skipping malformed row: {}", e);
                }
            }
        }

        router.states().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TrackerConfig, MAINNET_NON_CIRCULATING, MAINNET_TOKEN};
    use num_bigint::BigInt;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ZERO: &str = "0x0000000000000000000000000000000000000000";
    const ALICE: &str = "0x00000000000000000000000000000000000000a1";
    const BOB: &str = "0x00000000000000000000000000000000000000b0";

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn strategy() -> SyncProcessingStrategy {
        SyncProcessingStrategy::new(TrackerConfig::mainnet().resolve().unwrap())
    }

    fn transfers(rows: &[(&str, &str, &str)]) -> String {
        let mut content = String::from("token,from,to,amount\n");
        for (from, to, amount) in rows {
            content.push_str(&format!("{},{},{},{}\n", MAINNET_TOKEN, from, to, amount));
        }
        content
    }

    #[test]
    fn test_sync_strategy_processes_mint() {
        let file = create_temp_csv(&transfers(&[(ZERO, ALICE, "100")]));

        let mut output = Vec::new();
        strategy().process(file.path(), &mut output, None).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            format!("id,total,circulating\n{},100,100\n", MAINNET_TOKEN)
        );
    }

    #[test]
    fn test_sync_strategy_tracks_exclusions() {
        let dao = MAINNET_NON_CIRCULATING[2];
        let file = create_temp_csv(&transfers(&[
            (ZERO, ALICE, "1000"),
            (ZERO, dao, "1000"),
            (dao, BOB, "400"),
            (ALICE, ZERO, "100"),
        ]));

        let states = strategy().replay(file.path()).unwrap();

        assert_eq!(states.len(), 1);
        assert_eq!(states[0].supply.total, BigInt::from(1900));
        assert_eq!(states[0].supply.circulating, BigInt::from(1300));
        assert_eq!(states[0].holders.len(), 3);
    }

    #[test]
    fn test_sync_strategy_writes_holders() {
        let file = create_temp_csv(&transfers(&[(ZERO, ALICE, "100"), (ALICE, BOB, "30")]));

        let mut output = Vec::new();
        let mut holders = Vec::new();
        strategy()
            .process(file.path(), &mut output, Some(&mut holders))
            .unwrap();

        assert_eq!(
            String::from_utf8(holders).unwrap(),
            format!(
                "token,id,balance\n{token},{alice},70\n{token},{bob},30\n",
                token = MAINNET_TOKEN,
                alice = ALICE,
                bob = BOB
            )
        );
    }

    #[test]
    fn test_sync_strategy_skips_malformed_rows() {
        let content = format!(
            "{}{},{},{},5\n",
            transfers(&[(ZERO, ALICE, "100"), (ALICE, BOB, "-5"), (ALICE, "0xbad", "5")]),
            "0xSomeOtherToken",
            ZERO,
            ALICE
        );
        let file = create_temp_csv(&content);

        let states = strategy().replay(file.path()).unwrap();

        assert_eq!(states[0].supply.total, BigInt::from(100));
        assert_eq!(states[0].holders.len(), 1);
        assert_eq!(states[0].holders[0].balance, BigInt::from(100));
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let result = strategy().replay(Path::new("nonexistent.csv"));
        assert_eq!(result.unwrap_err(), "File not found: nonexistent.csv");
    }

    #[test]
    fn test_sync_strategy_reports_untouched_tokens() {
        let file = create_temp_csv(&transfers(&[]));

        let mut output = Vec::new();
        strategy().process(file.path(), &mut output, None).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            format!("id,total,circulating\n{},0,0\n", MAINNET_TOKEN)
        );
    }

    #[test]
    fn test_sync_strategy_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncProcessingStrategy>();
    }
}
