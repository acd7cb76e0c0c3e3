//! Supply record type
//!
//! One `Supply` exists per tracked token. It carries the two running
//! aggregates: everything in existence (`total`) and everything not parked in
//! an excluded address (`circulating`).

use super::address::TokenId;
use super::holder::Holder;
use num_bigint::BigInt;
use num_traits::Zero;
use serde::Serialize;

/// Total and circulating supply for one token identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Supply {
    /// Token identity this record belongs to
    pub id: TokenId,

    /// All tokens in existence (mint/burn adjusted)
    pub total: BigInt,

    /// Total minus tokens held by excluded addresses
    ///
    /// Never exceeds `total` unless the exclusion set is misconfigured.
    pub circulating: BigInt,
}

impl Supply {
    /// Create a zeroed supply record
    pub fn new(id: TokenId) -> Self {
        Supply {
            id,
            total: BigInt::zero(),
            circulating: BigInt::zero(),
        }
    }

    /// Read-side view, matching the `{ total, circulating }` shape served by
    /// the supply query API
    pub fn snapshot(&self) -> SupplySnapshot {
        SupplySnapshot {
            total: self.total.to_string(),
            circulating: self.circulating.to_string(),
        }
    }
}

/// Serializable supply record as exposed to read-side consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplySnapshot {
    pub total: String,
    pub circulating: String,
}

/// Everything tracked for one token at the end of a replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenState {
    pub supply: Supply,

    /// Persisted holders, sorted by address
    pub holders: Vec<Holder>,
}
