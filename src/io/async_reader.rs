//! Batched async reader over transfer rows
//!
//! Feeds the async strategy: each call to [`AsyncReader::read_batch`] pulls up
//! to N valid transfers off a `csv-async` deserializer. Rows that fail to
//! parse never reach the shard router; they are logged with their line
//! number and dropped here.
//!
//! ```text
//! futures AsyncRead → csv_async deserializer → CsvRecord → TransferRecord batch
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::{SupplyError, TransferRecord};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Async transfer reader yielding fixed-size batches
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 0,
        }
    }

    /// Read a batch of transfer records
    ///
    /// Reads up to `batch_size` rows, converting them to TransferRecords.
    /// Invalid rows are logged with their line number and skipped; they count
    /// towards neither the batch nor its size limit.
    ///
    /// # Returns
    ///
    /// A vector of successfully converted transfer records.
    /// Returns an empty vector when the end of the file is reached.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<TransferRecord> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => {
                    self.line_num += 1;
                    // +1 for the header row
                    let line = self.line_num + 1;
                    match convert_csv_record(csv_record) {
                        Ok(transfer_record) => batch.push(transfer_record),
                        Err(e) => {
                            let e = e.at_line(line);
                            tracing::warn!(line, "Skipping malformed transfer: {}", e);
                        }
                    }
                }
                Some(Err(e)) => {
                    self.line_num += 1;
                    let line = self.line_num + 1;
                    let e = SupplyError::parse_error(Some(line), &e.to_string());
                    tracing::warn!(line, "Skipping malformed row: {}", e);
                }
                None => break,
            }
        }

        batch
    }
}
