//! JSON decoder for signal record batches.
//!
//! A batch is a JSON array of records, optionally gzip-compressed. Each
//! element is decoded on its own: an element that fails to decode is
//! counted and skipped so one bad report never drops the whole batch.

use std::borrow::Cow;
use std::io::Read;

use anyhow::Result;
use flate2::read::GzDecoder;
use tracing::{debug, warn};

use crate::model::SignalRecord;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Default)]
pub struct ParsedBatch {
    pub records: Vec<SignalRecord>,
    /// Elements that could not be decoded into a record.
    pub rejected: usize,
}

/// Decodes a batch from raw bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a JSON array (after gzip
/// decompression, when the gzip magic is present).
pub fn parse_records(bytes: &[u8]) -> Result<ParsedBatch> {
    let bytes = decompress(bytes)?;
    let values: Vec<serde_json::Value> = serde_json::from_slice(&bytes)?;

    let mut batch = ParsedBatch::default();
    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<SignalRecord>(value) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                batch.rejected += 1;
                warn!(index, error = %e, "Skipping record that failed to decode");
            }
        }
    }

    debug!(
        decoded = batch.records.len(),
        rejected = batch.rejected,
        "Record batch parsed"
    );
    Ok(batch)
}

/// Reads and decodes a batch from a file on disk.
#[tracing::instrument]
pub fn load_records(path: &str) -> Result<ParsedBatch> {
    let bytes = std::fs::read(path)?;
    parse_records(&bytes)
}

fn decompress(bytes: &[u8]) -> Result<Cow<'_, [u8]>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(Cow::Borrowed(bytes));
    }

    let mut decoded = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut decoded)?;
    Ok(Cow::Owned(decoded))
}
