//! Holder record type
//!
//! A holder is an address together with its current token balance.

use super::address::Address;
use num_bigint::BigInt;
use num_traits::Zero;
use serde::Serialize;

/// Token balance held by a single address
///
/// Balances are unbounded signed integers. They stay non-negative when the
/// event stream is consistent; a negative balance is reported as an
/// [`Underflow`](super::Underflow) but still stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holder {
    /// The holder's address (record key is its lower-case hex form)
    pub id: Address,

    /// Current balance in the token's smallest unit
    pub balance: BigInt,
}

impl Holder {
    /// Create a holder with a zero balance
    pub fn new(id: Address) -> Self {
        Holder {
            id,
            balance: BigInt::zero(),
        }
    }

    /// Read-side view with the balance rendered as a decimal string
    pub fn snapshot(&self) -> HolderSnapshot {
        HolderSnapshot {
            id: self.id.to_hex(),
            balance: self.balance.to_string(),
        }
    }
}

/// Serializable holder record as exposed to read-side consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HolderSnapshot {
    pub id: String,
    pub balance: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_holder_has_zero_balance() {
        let holder = Holder::new(Address::ZERO);
        assert!(holder.balance.is_zero());
    }

    #[test]
    fn test_snapshot_uses_decimal_and_lowercase_hex() {
        let id: Address = "0xA03be496e67Ec29bC62F01a428683D7F9c204930".parse().unwrap();
        let mut holder = Holder::new(id);
        holder.balance = "340282366920938463463374607431768211456".parse().unwrap();

        let snapshot = holder.snapshot();
        assert_eq!(snapshot.id, "0xa03be496e67ec29bc62f01a428683d7f9c204930");
        assert_eq!(snapshot.balance, "340282366920938463463374607431768211456");
    }
}
