//! Core traits for address classification and record storage
//!
//! These are the seams the [`TransferProcessor`](super::TransferProcessor) is
//! generic over: which addresses count as non-circulating, and where holder
//! and supply records live.

use crate::types::{Address, Holder, Supply, SupplyError, TokenId};

/// Decides whether an address is excluded from circulating supply
///
/// Implementations must be pure: the answer depends only on the configured
/// policy and the address, never on balances or previous calls. The zero
/// address is handled by the processor before classification matters, but
/// `is_excluded` must still answer for it.
pub trait ExclusionPolicy {
    /// Whether tokens held by `address` are non-circulating
    fn is_excluded(&self, address: &Address) -> bool;
}

/// Storage for holder balance records
///
/// Every `put_holder` is a durable write; there is no batching. A failed
/// write must be reported as an error so the event can be aborted.
pub trait HolderStore {
    /// Look up a holder by address
    fn get_holder(&self, id: &Address) -> Result<Option<Holder>, SupplyError>;

    /// Persist a holder record, replacing any existing one
    fn put_holder(&mut self, holder: &Holder) -> Result<(), SupplyError>;
}

/// Storage for per-token supply aggregates
pub trait SupplyStore {
    /// Look up the supply record for a token
    fn get_supply(&self, id: &TokenId) -> Result<Option<Supply>, SupplyError>;

    /// Return the existing record, or create, persist and return a zeroed one
    ///
    /// Creation is first-writer-wins: if a record already exists it is
    /// returned unchanged, never overwritten.
    fn get_or_init_supply(&mut self, id: &TokenId) -> Result<Supply, SupplyError>;

    /// Persist a supply record, replacing any existing one
    fn put_supply(&mut self, supply: &Supply) -> Result<(), SupplyError>;
}
