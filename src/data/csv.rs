//! CSV reader for run tables, built on the `csv` crate.
//!
//! The first row is the header. Headers are trimmed and a leading byte
//! order mark is dropped. Empty cells are left out of the record so they
//! classify as missing.

use super::{Dataset, FieldValue, Record};
use crate::errors::DataError;
use csv::{ErrorKind, Reader, ReaderBuilder, Trim};
use std::io;
use std::path::Path;

fn builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(true).trim(Trim::Headers);
    builder
}

/// Read and parse a CSV file.
pub fn read_csv(path: &Path) -> Result<Dataset, DataError> {
    let reader = builder().from_path(path).map_err(|err| {
        let message = err.to_string();
        match err.into_kind() {
            ErrorKind::Io(source) => DataError::Read {
                path: path.to_path_buf(),
                source,
            },
            _ => DataError::Parse { message },
        }
    })?;
    let dataset = read_records(reader)?;
    log::debug!(
        "Loaded {} runs with {} columns from {}",
        dataset.len(),
        dataset.columns().len(),
        path.display()
    );
    Ok(dataset)
}

/// Parse CSV text whose first row is the header.
pub fn parse_csv(contents: &str) -> Result<Dataset, DataError> {
    read_records(builder().from_reader(contents.as_bytes()))
}

// Byte records keep a stray non-UTF-8 cell from failing the whole load.
fn read_records<R: io::Read>(mut reader: Reader<R>) -> Result<Dataset, DataError> {
    let columns: Vec<String> = reader
        .byte_headers()
        .map_err(convert_error)?
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let name = String::from_utf8_lossy(raw);
            let name = if i == 0 {
                name.trim_start_matches('\u{feff}').trim()
            } else {
                name.trim()
            };
            name.to_string()
        })
        .collect();
    if columns.iter().all(String::is_empty) {
        return Err(DataError::Empty);
    }

    let records = reader
        .byte_records()
        .map(|row| {
            let row = row.map_err(convert_error)?;
            Ok(columns
                .iter()
                .zip(row.iter())
                .filter(|(_, raw)| !raw.is_empty())
                .map(|(name, raw)| {
                    let value = String::from_utf8_lossy(raw).into_owned();
                    (name.clone(), FieldValue::Text(value))
                })
                .collect::<Record>())
        })
        .collect::<Result<Vec<_>, DataError>>()?;

    Ok(Dataset::new(columns, records))
}

fn convert_error(err: csv::Error) -> DataError {
    let message = err.to_string();
    match err.into_kind() {
        ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => DataError::RaggedRow {
            line: pos.map_or(0, |p| p.line()),
            expected: expected_len,
            found: len,
        },
        _ => DataError::Parse { message },
    }
}
