//! Error types for the token supply tracker
//!
//! This module defines all error types that can occur while replaying transfers.
//! Errors are designed to be descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Parsing Errors**: Malformed CSV, invalid data types, etc.
//! - **Malformed Events**: Bad addresses, negative or unparseable amounts,
//!   transfers for a token nobody configured. Fatal to the event only.
//! - **Store Errors**: A holder or supply write failed. The event is aborted
//!   and the failure is surfaced to whoever delivered it.
//!
//! Balances or aggregates going negative are *not* errors; see
//! [`Underflow`](crate::types::Underflow).

use std::io;
use std::path::Path;
use thiserror::Error;

/// Main error type for the supply tracker
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SupplyError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the record is skipped and replay continues.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Address is not 20 bytes of 0x-prefixed hex
    #[error("Invalid address '{input}': {reason}")]
    InvalidAddress {
        /// The offending input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Amount is not a base-10 integer, or does not fit in 256 bits
    #[error("Invalid amount '{amount}'")]
    InvalidAmount {
        /// The invalid amount string
        amount: String,
    },

    /// Amount parsed but is below zero
    #[error("Negative amount {amount} in transfer from {from} to {to}")]
    NegativeAmount {
        /// Decimal rendering of the amount
        amount: String,
        /// Sender address
        from: String,
        /// Receiver address
        to: String,
    },

    /// Transfer references a token with no configured deployment
    #[error("No deployment configured for token {token}")]
    UnknownToken {
        /// The token identity from the event
        token: String,
    },

    /// A store read or write failed
    ///
    /// Not recoverable within the engine: processing of the event stops and
    /// the error propagates to the event source.
    #[error("Store failure during {operation} for {key}: {message}")]
    StoreFailure {
        /// Store operation that failed (get, put, get_or_init)
        operation: String,
        /// Record key involved
        key: String,
        /// Backend-specific description
        message: String,
    },
}

impl From<std::io::Error> for SupplyError {
    fn from(error: std::io::Error) -> Self {
        SupplyError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for SupplyError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        SupplyError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl SupplyError {
    /// Map a failure to open `path` to `FileNotFound` or `IoError`
    pub fn file_open(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => SupplyError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => error.into(),
        }
    }

    /// Create a ParseError error
    pub fn parse_error(line: Option<u64>, message: &str) -> Self {
        SupplyError::ParseError {
            line,
            message: message.to_string(),
        }
    }

    /// Attach a line number to a `ParseError` that has none
    ///
    /// Other variants are returned unchanged.
    pub fn at_line(self, line: u64) -> Self {
        match self {
            SupplyError::ParseError {
                line: None,
                message,
            } => SupplyError::ParseError {
                line: Some(line),
                message,
            },
            other => other,
        }
    }

    /// Create an InvalidAddress error
    pub fn invalid_address(input: &str, reason: &str) -> Self {
        SupplyError::InvalidAddress {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str) -> Self {
        SupplyError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create a NegativeAmount error
    pub fn negative_amount(amount: &str, from: &str, to: &str) -> Self {
        SupplyError::NegativeAmount {
            amount: amount.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Create an UnknownToken error
    pub fn unknown_token(token: &str) -> Self {
        SupplyError::UnknownToken {
            token: token.to_string(),
        }
    }

    /// Create a StoreFailure error
    pub fn store_failure(operation: &str, key: &str, message: &str) -> Self {
        SupplyError::StoreFailure {
            operation: operation.to_string(),
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    /// Whether this error rejects a single event rather than the whole replay
    pub fn is_malformed_event(&self) -> bool {
        matches!(
            self,
            SupplyError::ParseError { .. }
                | SupplyError::InvalidAddress { .. }
                | SupplyError::InvalidAmount { .. }
                | SupplyError::NegativeAmount { .. }
                | SupplyError::UnknownToken { .. }
        )
    }
}
