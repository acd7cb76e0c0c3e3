//! Transfer-related types
//!
//! This module defines the transfer event consumed by the processor, the
//! token-tagged record produced by the readers, and the outcome reported back
//! for each processed event.

use super::address::Address;
use num_bigint::BigInt;
use std::fmt;

/// A single ownership transfer observed on chain
///
/// `from == ZERO` is a mint and `to == ZERO` is a burn. Amounts are expected
/// to be non-negative; the processor rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    pub from: Address,
    pub to: Address,
    pub amount: BigInt,
}

impl TransferEvent {
    pub fn new(from: Address, to: Address, amount: impl Into<BigInt>) -> Self {
        TransferEvent {
            from,
            to,
            amount: amount.into(),
        }
    }
}

/// Transfer event tagged with the token contract it was emitted by
///
/// This is what the CSV readers yield. The token string is kept as read so it
/// can be routed to the matching deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    /// Token contract address as it appeared in the input
    pub token: String,

    /// The transfer itself
    pub event: TransferEvent,
}

/// Which value went negative
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnderflowSubject {
    /// A holder's balance
    Balance(Address),
    /// The token's total supply
    Total,
    /// The token's circulating supply
    Circulating,
}

impl fmt::Display for UnderflowSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnderflowSubject::Balance(address) => write!(f, "balance of {}", address),
            UnderflowSubject::Total => f.write_str("total supply"),
            UnderflowSubject::Circulating => f.write_str("circulating supply"),
        }
    }
}

/// A value that ended up below zero after a transfer was applied
///
/// The arithmetic is kept; this only signals that the event stream or the
/// exclusion policy is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Underflow {
    pub subject: UnderflowSubject,
    pub value: BigInt,
}

impl fmt::Display for Underflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dropped below zero to {}", self.subject, self.value)
    }
}

/// What processing one transfer did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferOutcome {
    /// Whether the supply aggregate was loaded and written
    pub supply_affecting: bool,

    /// Values that went negative while applying the transfer
    pub underflows: Vec<Underflow>,
}
