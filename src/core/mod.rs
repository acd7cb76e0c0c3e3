//! Core business logic module
//!
//! This module contains the supply accounting components:
//! - `traits` - Exclusion policy and record store abstractions
//! - `classifier` - Exclusion policies (explicit set, vesting contract)
//! - `ledger` - Holder balance debits and credits
//! - `aggregate` - Total and circulating supply mutations
//! - `store` - In-memory record store
//! - `processor` - Per-transfer orchestration
//! - `router` - Per-token dispatch for multi-token inputs
//! - `async` - Concurrent, token-sharded batch processing

pub mod aggregate;
pub mod r#async;
pub mod classifier;
pub mod ledger;
pub mod processor;
pub mod router;
pub mod store;
pub mod traits;

pub use aggregate::SupplyAggregate;
pub use classifier::{Exclusion, ExplicitExclusion, VestingContract};
pub use ledger::BalanceLedger;
pub use processor::TransferProcessor;
pub use r#async::{ProcessingResult, ShardRouter};
pub use router::{token_key, DeploymentProcessor, TokenRouter};
pub use store::MemoryStore;
pub use traits::{ExclusionPolicy, HolderStore, SupplyStore};
