//! Token Supply Tracker Library
//! # Overview
//!
//! This library replays ERC-20 style transfer events and maintains, per token,
//! every holder's balance plus two aggregates: total supply and circulating
//! supply. Replay runs through either a sync or an async strategy.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Address, Holder, Supply, TransferEvent, etc.)
//! - [`config`] - Deployment presets and TOML configuration
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::classifier`] - Which addresses are non-circulating
//!   - [`core::ledger`] - Holder balance debits and credits
//!   - [`core::aggregate`] - Total and circulating supply mutations
//!   - [`core::processor`] - Per-transfer orchestration
//! - [`io`] - CSV input and output
//! - [`strategy`] - Sync and async replay pipelines
//!
//! # Transfer Semantics
//!
//! The zero address is the mint source and burn sink:
//!
//! - **Mint** (`from` is zero): total and circulating rise
//! - **Burn** (`to` is zero): total and circulating fall
//! - **Into an excluded address**: circulating falls
//! - **Out of an excluded address**: circulating rises
//!
//! These rules are independent, so a mint straight into an excluded address
//! raises total only. Transfers between regular holders move balances and
//! leave both aggregates alone.

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use config::{ConfigError, Deployment, TrackerConfig};
pub use core::{
    BalanceLedger, Exclusion, ExclusionPolicy, ExplicitExclusion, HolderStore, MemoryStore,
    SupplyAggregate, SupplyStore, TransferProcessor, VestingContract,
};
pub use io::{write_holders_csv, write_supply_csv};
pub use types::{
    Address, Holder, HolderSnapshot, Supply, SupplyError, SupplySnapshot, TokenId, TokenState,
    TransferEvent, TransferOutcome, TransferRecord, Underflow, UnderflowSubject,
};
