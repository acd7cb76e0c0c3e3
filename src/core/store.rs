//! In-memory record store
//!
//! This module provides the `MemoryStore` component that keeps holder and
//! supply records in HashMaps. It backs the CLI replay and the tests; a
//! database-backed store would implement the same two traits.
//!
//! # Initialization
//!
//! `get_or_init_supply` only inserts when no record exists, so the first
//! writer wins and later callers re-read the same record.

use crate::core::traits::{HolderStore, SupplyStore};
use crate::types::{Address, Holder, Supply, SupplyError, TokenId};
use std::collections::HashMap;

/// HashMap-backed holder and supply storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// Map of address to holder record
    holders: HashMap<Address, Holder>,

    /// Map of token identity to supply record
    supplies: HashMap<TokenId, Supply>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// All persisted holders, sorted by address
    pub fn holders(&self) -> Vec<&Holder> {
        let mut holders: Vec<&Holder> = self.holders.values().collect();
        holders.sort_by_key(|holder| holder.id);
        holders
    }

    pub fn holder_count(&self) -> usize {
        self.holders.len()
    }

    /// Whether a holder record exists for the address
    pub fn contains_holder(&self, id: &Address) -> bool {
        self.holders.contains_key(id)
    }

    /// All persisted supply records, sorted by token identity
    pub fn supplies(&self) -> Vec<&Supply> {
        let mut supplies: Vec<&Supply> = self.supplies.values().collect();
        supplies.sort_by(|a, b| a.id.cmp(&b.id));
        supplies
    }
}

impl HolderStore for MemoryStore {
    fn get_holder(&self, id: &Address) -> Result<Option<Holder>, SupplyError> {
        Ok(self.holders.get(id).cloned())
    }

    fn put_holder(&mut self, holder: &Holder) -> Result<(), SupplyError> {
        self.holders.insert(holder.id, holder.clone());
        Ok(())
    }
}

impl SupplyStore for MemoryStore {
    fn get_supply(&self, id: &TokenId) -> Result<Option<Supply>, SupplyError> {
        Ok(self.supplies.get(id).cloned())
    }

    fn get_or_init_supply(&mut self, id: &TokenId) -> Result<Supply, SupplyError> {
        let supply = self.supplies.entry(id.clone()).or_insert_with(|| {
            tracing::info!(token = %id, "Supply record initialized");
            Supply::new(id.clone())
        });
        Ok(supply.clone())
    }

    fn put_supply(&mut self, supply: &Supply) -> Result<(), SupplyError> {
        self.supplies.insert(supply.id.clone(), supply.clone());
        Ok(())
    }
}
