//! Blocking CSV reader over transfer rows
//!
//! Streams `token,from,to,amount` rows from a file, one [`TransferRecord`] at
//! a time, so memory stays flat regardless of input size.
//!
//! ```no_run
//! use token_supply_tracker::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("transfers.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Transfer of {}: {:?}", record.token, record.event),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! Opening the file or reading its header fails `new()`. Everything after
//! that is per row: a bad row is yielded as a [`SupplyError`] and iteration
//! carries on with the next one. CSV-level failures come back as
//! `ParseError` carrying the file line; [`SyncReader::line`] gives the line of
//! the row just read for the other variants.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{SupplyError, TransferRecord};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous transfer reader
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
    row: StringRecord,
}

impl SyncReader {
    /// Open `path` and read its header row
    ///
    /// Fields are trimmed and short rows are accepted by the CSV layer, so a
    /// missing column shows up as an error on that row only.
    pub fn new(path: &Path) -> Result<Self, SupplyError> {
        let file = File::open(path).map_err(|e| SupplyError::file_open(path, e))?;

        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        let headers = reader.headers()?.clone();

        Ok(Self {
            reader,
            headers,
            row: StringRecord::new(),
        })
    }

    /// File line of the most recently read row (0 before the first)
    pub fn line(&self) -> u64 {
        self.row.position().map_or(0, |position| position.line())
    }
}

impl Iterator for SyncReader {
    type Item = Result<TransferRecord, SupplyError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.row) {
            Ok(false) => None,
            Ok(true) => {
                let line = self.line();
                let record = self
                    .row
                    .deserialize::<CsvRecord>(Some(&self.headers))
                    .map_err(|e| SupplyError::parse_error(Some(line), &e.to_string()))
                    .and_then(|csv_record| {
                        convert_csv_record(csv_record).map_err(|e| e.at_line(line))
                    });
                Some(record)
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}
