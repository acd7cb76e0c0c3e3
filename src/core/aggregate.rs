//! Supply aggregate mutations
//!
//! [`SupplyAggregate`] wraps one loaded [`Supply`] record for the duration of
//! a single transfer. The four mutations are plain additions/subtractions on
//! `total` and `circulating`; the record is written back once with
//! [`persist`](SupplyAggregate::persist).

use crate::core::traits::SupplyStore;
use crate::types::{Supply, SupplyError, TokenId, Underflow, UnderflowSubject};
use num_bigint::BigInt;
use num_traits::Signed;

/// A supply record checked out for mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupplyAggregate {
    supply: Supply,
}

impl SupplyAggregate {
    /// Load the token's supply record, creating and persisting a zeroed one
    /// on first use
    pub fn load<S: SupplyStore>(store: &mut S, token: &TokenId) -> Result<Self, SupplyError> {
        let supply = store.get_or_init_supply(token)?;
        Ok(SupplyAggregate { supply })
    }

    /// Wrap an already loaded record
    pub fn from_supply(supply: Supply) -> Self {
        SupplyAggregate { supply }
    }

    pub fn supply(&self) -> &Supply {
        &self.supply
    }

    /// New tokens entered existence and circulation
    pub fn mint(&mut self, amount: &BigInt) {
        tracing::info!(token = %self.supply.id, %amount, "Token minted");
        self.supply.total += amount;
        self.supply.circulating += amount;
    }

    /// Tokens left existence and circulation
    pub fn burn(&mut self, amount: &BigInt) {
        tracing::info!(token = %self.supply.id, %amount, "Token burned");
        self.supply.total -= amount;
        self.supply.circulating -= amount;
    }

    /// Tokens were parked in an excluded address
    pub fn move_into_exclusion(&mut self, amount: &BigInt) {
        tracing::info!(token = %self.supply.id, %amount, "Circulating supply decrease");
        self.supply.circulating -= amount;
    }

    /// Tokens left an excluded address
    pub fn move_out_of_exclusion(&mut self, amount: &BigInt) {
        tracing::info!(token = %self.supply.id, %amount, "Circulating supply increase");
        self.supply.circulating += amount;
    }

    /// Values of the current record that are below zero
    pub fn underflows(&self) -> Vec<Underflow> {
        let mut underflows = Vec::new();
        if self.supply.total.is_negative() {
            underflows.push(Underflow {
                subject: UnderflowSubject::Total,
                value: self.supply.total.clone(),
            });
        }
        if self.supply.circulating.is_negative() {
            underflows.push(Underflow {
                subject: UnderflowSubject::Circulating,
                value: self.supply.circulating.clone(),
            });
        }
        underflows
    }

    /// Write the record back and hand it out
    pub fn persist<S: SupplyStore>(self, store: &mut S) -> Result<Supply, SupplyError> {
        store.put_supply(&self.supply)?;
        Ok(self.supply)
    }
}
