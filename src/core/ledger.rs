//! Balance ledger
//!
//! This module provides the `BalanceLedger`, which applies the debit/credit
//! pair of every transfer to holder records.
//!
//! The ledger is responsible for:
//! - Creating holder records lazily on first appearance
//! - Debiting the sender and crediting the receiver
//! - Dropping every write aimed at the sentinel (zero) address, so the mint
//!   source / burn sink never gets a stored balance

use crate::core::traits::HolderStore;
use crate::types::{Address, Holder, SupplyError, Underflow, UnderflowSubject};
use num_bigint::BigInt;
use num_traits::Signed;

/// Applies transfers to holder balances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceLedger {
    /// Address whose holder record is never persisted
    sentinel: Address,
}

impl BalanceLedger {
    /// Create a ledger that treats `sentinel` as the null/burn address
    pub fn new(sentinel: Address) -> Self {
        BalanceLedger { sentinel }
    }

    pub fn sentinel(&self) -> Address {
        self.sentinel
    }

    /// Load the holder for `address`, or a fresh zero-balance one
    ///
    /// A fresh holder is not persisted until [`commit`](Self::commit).
    pub fn load_or_create<S: HolderStore>(
        &self,
        store: &S,
        address: Address,
    ) -> Result<Holder, SupplyError> {
        Ok(store
            .get_holder(&address)?
            .unwrap_or_else(|| Holder::new(address)))
    }

    /// Add `amount` to the holder's balance
    pub fn credit(&self, holder: &mut Holder, amount: &BigInt) {
        holder.balance += amount;
    }

    /// Subtract `amount` from the holder's balance
    ///
    /// The subtraction always happens. If the balance ends up negative on a
    /// real holder, the returned [`Underflow`] describes it; the sentinel is
    /// expected to go negative on every mint and is never reported.
    pub fn debit(&self, holder: &mut Holder, amount: &BigInt) -> Option<Underflow> {
        holder.balance -= amount;

        if holder.id != self.sentinel && holder.balance.is_negative() {
            return Some(Underflow {
                subject: UnderflowSubject::Balance(holder.id),
                value: holder.balance.clone(),
            });
        }
        None
    }

    /// Persist the holder unless it is the sentinel
    ///
    /// Returns whether a write was issued.
    pub fn commit<S: HolderStore>(
        &self,
        store: &mut S,
        holder: &Holder,
    ) -> Result<bool, SupplyError> {
        if holder.id == self.sentinel {
            return Ok(false);
        }
        store.put_holder(holder)?;
        Ok(true)
    }
}

impl Default for BalanceLedger {
    fn default() -> Self {
        Self::new(Address::ZERO)
    }
}
