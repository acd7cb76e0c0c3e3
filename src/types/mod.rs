//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `address`: Address and token identity types
//! - `holder`: Per-address balance records
//! - `supply`: Per-token supply aggregates
//! - `transfer`: Transfer events, records and outcomes
//! - `error`: Error types for the supply tracker

pub mod address;
pub mod error;
pub mod holder;
pub mod supply;
pub mod transfer;

pub use address::{Address, TokenId, ADDRESS_LEN};
pub use error::SupplyError;
pub use holder::{Holder, HolderSnapshot};
pub use supply::{Supply, SupplySnapshot, TokenState};
pub use transfer::{TransferEvent, TransferOutcome, TransferRecord, Underflow, UnderflowSubject};
