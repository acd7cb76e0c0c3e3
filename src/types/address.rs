//! Address and token identity types
//!
//! Addresses are fixed-width 20-byte account identifiers. They parse from
//! `0x`-prefixed hex in any letter case and always render as lower-case hex,
//! which is the canonical key used for holder records.

use super::error::SupplyError;
use std::fmt;
use std::str::FromStr;

/// Width of an address in bytes
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address, used as the mint source and burn sink
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Address(bytes)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// Canonical lower-case hex key (`0x` + 40 hex digits)
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = SupplyError;

    /// Parse a `0x`-prefixed, 40-digit hex string
    ///
    /// Mixed-case (checksummed) input is accepted; the checksum itself is not
    /// verified.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| SupplyError::invalid_address(s, "missing 0x prefix"))?;

        if digits.len() != ADDRESS_LEN * 2 {
            return Err(SupplyError::invalid_address(
                s,
                &format!("expected {} hex digits, got {}", ADDRESS_LEN * 2, digits.len()),
            ));
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| SupplyError::invalid_address(s, &e.to_string()))?;

        Ok(Address(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Stable key identifying the token whose supply is tracked
///
/// Kept verbatim as configured (including checksum casing) because it is the
/// record id the read side queries by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        TokenId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        TokenId::new(id)
    }
}
