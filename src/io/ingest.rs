//! Raw measurement ingest and normalization.
//!
//! This module turns one yearly export into a clean `EnergySeries`:
//!
//! 1. parse the delimited table (after the preamble rows)
//! 2. rename the raw value column (`kW`) to `Energia`
//! 3. rescale kW to MW
//! 4. clamp negative readings (night-time sensor noise) to zero
//! 5. parse the index as `DD/MM/YY HH:MM` timestamps
//!
//! The steps run in that order over the whole table, so a bad value is
//! reported before a bad timestamp. Nothing outside the returned series is
//! touched.

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use csv::StringRecord;

use crate::domain::{EnergySeries, RAW_TIMESTAMP_FORMAT, RawFormat, TextEncoding};
use crate::error::CompileError;

/// kW per MW.
const KW_PER_MW: f64 = 1000.0;

/// One data row as read from the file, before any conversion.
#[derive(Debug, Clone)]
struct RawRow {
    line: usize,
    index: String,
    value: String,
}

/// The parsed table: index label, value label and rows.
#[derive(Debug, Clone)]
struct RawTable {
    index_label: String,
    value_label: String,
    rows: Vec<RawRow>,
}

/// Read and normalize a single raw file.
pub fn read_formatted(path: &Path, format: &RawFormat) -> Result<EnergySeries, CompileError> {
    let text = read_text(path, format.encoding)?;

    // 1) Parse the table.
    let table = parse_table(path, &text, format)?;
    tracing::debug!(
        file = %path.display(),
        rows = table.rows.len(),
        index = %table.index_label,
        "parsed raw table"
    );

    // 2) Rename the value column.
    let table = rename_value_column(table);
    tracing::debug!(file = %path.display(), from = %format.value_column, to = %table.value_label, "renamed value column");

    // 3) kW -> MW.
    let mut values = rescale(path, &table.rows, format.decimal)?;

    // 4) Negative readings mean "no generation".
    clamp_negative(&mut values);

    // 5) Timestamps.
    let index = parse_index(path, &table.rows)?;

    Ok(EnergySeries {
        index_label: table.index_label,
        index,
        energy: values,
    })
}

fn read_text(path: &Path, encoding: TextEncoding) -> Result<String, CompileError> {
    let bytes = fs::read(path).map_err(|e| CompileError::io(path, e))?;
    match encoding {
        TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        TextEncoding::Utf8 => String::from_utf8(bytes).map_err(|e| {
            CompileError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        }),
    }
}

/// Drop the first `n` lines of `text`.
fn skip_lines(text: &str, n: usize) -> &str {
    let mut rest = text;
    for _ in 0..n {
        match rest.find('\n') {
            Some(i) => rest = &rest[i + 1..],
            None => return "",
        }
    }
    rest
}

fn parse_table(path: &Path, text: &str, format: &RawFormat) -> Result<RawTable, CompileError> {
    let skipped = format.skip_rows + format.header_offset;
    let body = skip_lines(text, skipped);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(format.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| CompileError::csv(path, e))?
        .clone();

    let index_label = headers
        .get(format.index_column)
        .map(normalize_header_name)
        .ok_or_else(|| CompileError::MissingColumn {
            path: path.to_path_buf(),
            column: format!("#{} (index)", format.index_column),
        })?;

    let value_idx = headers
        .iter()
        .position(|h| normalize_header_name(h) == format.value_column)
        .ok_or_else(|| CompileError::MissingColumn {
            path: path.to_path_buf(),
            column: format.value_column.clone(),
        })?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| CompileError::csv(path, e))?;
        let line = file_line(&record, skipped);
        rows.push(RawRow {
            line,
            index: cell(&record, format.index_column).to_string(),
            value: cell(&record, value_idx).to_string(),
        });
    }

    Ok(RawTable {
        index_label,
        value_label: format.value_column.clone(),
        rows,
    })
}

fn normalize_header_name(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

/// 1-based line number in the file on disk.
fn file_line(record: &StringRecord, skipped: usize) -> usize {
    // csv positions are 1-based within the body handed to the reader.
    record
        .position()
        .map(|p| p.line() as usize + skipped)
        .unwrap_or(0)
}

fn rename_value_column(mut table: RawTable) -> RawTable {
    table.value_label = crate::domain::ENERGY_COLUMN.to_string();
    table
}

fn rescale(path: &Path, rows: &[RawRow], decimal: char) -> Result<Vec<f64>, CompileError> {
    rows.iter()
        .map(|row| {
            parse_decimal(&row.value, decimal)
                .map(|v| v / KW_PER_MW)
                .ok_or_else(|| CompileError::Value {
                    path: path.to_path_buf(),
                    line: row.line,
                    value: row.value.clone(),
                })
        })
        .collect()
}

fn clamp_negative(values: &mut [f64]) {
    for v in values.iter_mut() {
        if *v < 0.0 {
            *v = 0.0;
        }
    }
}

fn parse_index(path: &Path, rows: &[RawRow]) -> Result<Vec<NaiveDateTime>, CompileError> {
    rows.iter()
        .map(|row| {
            NaiveDateTime::parse_from_str(&row.index, RAW_TIMESTAMP_FORMAT).map_err(|_| {
                CompileError::Format {
                    path: path.to_path_buf(),
                    line: row.line,
                    value: row.index.clone(),
                    expected: RAW_TIMESTAMP_FORMAT,
                }
            })
        })
        .collect()
}

/// Parse a number written with `decimal` as the decimal marker.
///
/// An empty cell is a missing reading (`NaN`).
pub(crate) fn parse_decimal(s: &str, decimal: char) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(f64::NAN);
    }
    if decimal == '.' {
        return s.parse().ok();
    }
    // A '.' in a decimal-comma file is ambiguous (thousands separator?), reject it.
    if s.contains('.') {
        return None;
    }
    s.replace(decimal, ".").parse().ok()
}
