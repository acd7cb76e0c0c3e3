//! CSV format handling for transfer records and supply output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to domain types
//! - Supply and holder output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{Address, SupplyError, TokenState, TransferEvent, TransferRecord};
use num_bigint::BigInt;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Widest amount an ERC-20 transfer can carry
const AMOUNT_BITS: u64 = 256;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: token, from, to, amount.
/// Everything is read as text; addresses and the amount are parsed in
/// [`convert_csv_record`] so a bad value yields a descriptive message.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub token: String,
    pub from: String,
    pub to: String,
    pub amount: String,
}

/// Parse a transfer amount
///
/// Accepts base-10 digits with an optional leading `-`, nothing else: no `+`,
/// no `_` separators, no decimals or exponents. The magnitude must fit in a
/// uint256. The sign is kept so the processor can reject negative amounts
/// with their own error.
pub fn parse_amount(input: &str) -> Result<BigInt, SupplyError> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SupplyError::invalid_amount(input));
    }

    let amount = BigInt::parse_bytes(trimmed.as_bytes(), 10)
        .ok_or_else(|| SupplyError::invalid_amount(input))?;

    if amount.magnitude().bits() > AMOUNT_BITS {
        return Err(SupplyError::invalid_amount(input));
    }

    Ok(amount)
}

/// Convert a CsvRecord to a TransferRecord
///
/// This function:
/// - Parses both addresses (`0x` + 40 hex digits, any case)
/// - Parses the amount with [`parse_amount`]
///
/// Negative amounts are *not* rejected here; the processor refuses them with a
/// dedicated error.
///
/// # Errors
///
/// - `ParseError` (without a line; readers attach it) for a missing token
/// - `InvalidAddress` for a bad sender or receiver
/// - `InvalidAmount` for an amount [`parse_amount`] refuses
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<TransferRecord, SupplyError> {
    let token = csv_record.token.trim();
    if token.is_empty() {
        return Err(SupplyError::parse_error(None, "Missing token"));
    }

    let from = Address::from_str(&csv_record.from)?;
    let to = Address::from_str(&csv_record.to)?;
    let amount = parse_amount(&csv_record.amount)?;

    Ok(TransferRecord {
        token: token.to_string(),
        event: TransferEvent { from, to, amount },
    })
}

/// Write supply aggregates to CSV format
///
/// Writes one row per token with columns: id, total, circulating.
/// Rows are sorted by token id for deterministic output; the numbers come
/// from [`Supply::snapshot`](crate::types::Supply::snapshot).
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_supply_csv(states: &[TokenState], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = row_writer(output);

    writer
        .write_record(["id", "total", "circulating"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut supplies: Vec<_> = states.iter().map(|state| &state.supply).collect();
    supplies.sort_by(|a, b| a.id.cmp(&b.id));

    for supply in supplies {
        writer
            .serialize((supply.id.as_str(), supply.snapshot()))
            .map_err(|e| format!("Failed to write supply record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write holder balances to CSV format
///
/// Columns: token, id, balance. Sorted by token, then by holder address.
pub fn write_holders_csv(states: &[TokenState], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = row_writer(output);

    writer
        .write_record(["token", "id", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_states: Vec<&TokenState> = states.iter().collect();
    sorted_states.sort_by(|a, b| a.supply.id.cmp(&b.supply.id));

    for state in sorted_states {
        let mut holders: Vec<_> = state.holders.iter().collect();
        holders.sort_by_key(|holder| holder.id);

        for holder in holders {
            writer
                .serialize((state.supply.id.as_str(), holder.snapshot()))
                .map_err(|e| format!("Failed to write holder record: {}", e))?;
        }
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

// Headers are written explicitly so an empty table still gets one; the
// snapshots are flattened after the token id.
fn row_writer(output: &mut dyn Write) -> csv::Writer<&mut dyn Write> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Holder, Supply, TokenId};
    use rstest::rstest;

    const ZERO: &str = "0x0000000000000000000000000000000000000000";
    const ALICE: &str = "0x00000000000000000000000000000000000000A1";

    fn csv_record(from: &str, to: &str, amount: &str) -> CsvRecord {
        CsvRecord {
            token: "0xtoken".to_string(),
            from: from.to_string(),
            to: to.to_string(),
            amount: amount.to_string(),
        }
    }

    fn state(token: &str, total: i64, circulating: i64, holders: &[(u8, i64)]) -> TokenState {
        let mut supply = Supply::new(TokenId::new(token));
        supply.total = BigInt::from(total);
        supply.circulating = BigInt::from(circulating);
        TokenState {
            supply,
            holders: holders
                .iter()
                .map(|(last, balance)| {
                    let mut bytes = [0u8; 20];
                    bytes[19] = *last;
                    let mut holder = Holder::new(Address::from_bytes(bytes));
                    holder.balance = BigInt::from(*balance);
                    holder
                })
                .collect(),
        }
    }

    #[test]
    fn test_convert_csv_record_valid() {
        let record = convert_csv_record(csv_record(ZERO, ALICE, "1337")).unwrap();

        assert_eq!(record.token, "0xtoken");
        assert!(record.event.from.is_zero());
        assert_eq!(
            record.event.to.to_hex(),
            "0x00000000000000000000000000000000000000a1"
        );
        assert_eq!(record.event.amount, BigInt::from(1337));
    }

    #[rstest]
    #[case::whitespace("  42  ", BigInt::from(42))]
    #[case::zero("0", BigInt::from(0))]
    #[case::negative_passes_through("-5", BigInt::from(-5))]
    #[case::leading_zeros("007", BigInt::from(7))]
    #[case::max_uint256(
        "115792089237316195423570985008687907853269984665640564039457584007913129639935",
        (BigInt::from(1) << 256) - 1
    )]
    fn test_convert_csv_record_amount_parsing(#[case] amount: &str, #[case] expected: BigInt) {
        let record = convert_csv_record(csv_record(ZERO, ALICE, amount)).unwrap();
        assert_eq!(record.event.amount, expected);
    }

    #[rstest]
    #[case::decimal("1.5")]
    #[case::text("lots")]
    #[case::empty("")]
    #[case::lone_minus("-")]
    #[case::digit_separators("1_000")]
    #[case::explicit_plus("+5")]
    #[case::hex("0x10")]
    #[case::exponent("1e18")]
    #[case::inner_space("1 000")]
    #[case::above_uint256(
        "115792089237316195423570985008687907853269984665640564039457584007913129639936"
    )]
    #[case::below_negative_uint256(
        "-115792089237316195423570985008687907853269984665640564039457584007913129639936"
    )]
    fn test_parse_amount_rejects(#[case] amount: &str) {
        assert_eq!(
            parse_amount(amount),
            Err(SupplyError::InvalidAmount {
                amount: amount.to_string()
            })
        );
    }

    #[test]
    fn test_convert_csv_record_rejects_separator_amount() {
        let result = convert_csv_record(csv_record(ZERO, ALICE, "1_000"));
        assert!(matches!(result, Err(SupplyError::InvalidAmount { .. })));
    }

    #[rstest]
    #[case::short_sender("0x1234", ALICE, "0x1234")]
    #[case::unprefixed_receiver(
        ZERO,
        "00000000000000000000000000000000000000a1",
        "00000000000000000000000000000000000000a1"
    )]
    #[case::non_hex_receiver(
        ZERO,
        "0x00000000000000000000000000000000000000zz",
        "0x00000000000000000000000000000000000000zz"
    )]
    fn test_convert_csv_record_address_errors(
        #[case] from: &str,
        #[case] to: &str,
        #[case] offending: &str,
    ) {
        match convert_csv_record(csv_record(from, to, "1")) {
            Err(SupplyError::InvalidAddress { input, .. }) => assert_eq!(input.trim(), offending),
            other => panic!("Expected InvalidAddress, got {:?}", other),
        }
    }

    #[test]
    fn test_convert_csv_record_missing_token() {
        let mut record = csv_record(ZERO, ALICE, "1");
        record.token = "   ".to_string();
        assert_eq!(
            convert_csv_record(record).unwrap_err(),
            SupplyError::parse_error(None, "Missing token")
        );
    }

    #[rstest]
    #[case::single_token(
        vec![state("0xtoken", 2000, 1000, &[])],
        "id,total,circulating\n0xtoken,2000,1000\n"
    )]
    #[case::sorted_by_id(
        vec![state("0xbbb", 1, 1, &[]), state("0xaaa", 2, 0, &[])],
        "id,total,circulating\n0xaaa,2,0\n0xbbb,1,1\n"
    )]
    #[case::negative_values(
        vec![state("0xtoken", -10, -10, &[])],
        "id,total,circulating\n0xtoken,-10,-10\n"
    )]
    #[case::empty(vec![], "id,total,circulating\n")]
    fn test_write_supply_csv(#[case] states: Vec<TokenState>, #[case] expected: &str) {
        let mut output = Vec::new();
        write_supply_csv(&states, &mut output).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_write_supply_csv_large_values() {
        let mut states = vec![state("0xtoken", 0, 0, &[])];
        states[0].supply.total = BigInt::from(u128::MAX) * BigInt::from(3);

        let mut output = Vec::new();
        write_supply_csv(&states, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,total,circulating\n0xtoken,1020847100762815390390123822295304634365,0\n"
        );
    }

    #[test]
    fn test_write_holders_csv() {
        let states = vec![
            state("0xbbb", 0, 0, &[(2, 5), (1, 7)]),
            state("0xaaa", 0, 0, &[(3, -1)]),
        ];

        let mut output = Vec::new();
        write_holders_csv(&states, &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "token,id,balance\n\
             0xaaa,0x0000000000000000000000000000000000000003,-1\n\
             0xbbb,0x0000000000000000000000000000000000000001,7\n\
             0xbbb,0x0000000000000000000000000000000000000002,5\n"
        );
    }
}
