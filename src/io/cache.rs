//! Read a previously compiled series back from disk.
//!
//! The file is taken verbatim: no unit conversion, clamping or loss factor is
//! applied, since it already went through all of them when it was written.

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{ENERGY_COLUMN, EnergySeries};
use crate::error::CompileError;
use crate::io::ingest::parse_decimal;

/// Index layouts accepted when reading a cached output.
const CACHE_TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Load a compiled series.
///
/// A missing file is `CompileError::MissingOutput`, never an empty series.
pub fn read_series_csv(path: &Path) -> Result<EnergySeries, CompileError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CompileError::MissingOutput(path.to_path_buf()),
        _ => CompileError::io(path, e),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(|e| CompileError::csv(path, e))?.clone();
    let index_label = headers.get(0).unwrap_or("").to_string();
    let value_idx = headers
        .iter()
        .position(|h| h == ENERGY_COLUMN)
        .ok_or_else(|| CompileError::MissingColumn {
            path: path.to_path_buf(),
            column: ENERGY_COLUMN.to_string(),
        })?;

    let mut series = EnergySeries::new(index_label);
    for result in reader.records() {
        let record = result.map_err(|e| CompileError::csv(path, e))?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        let raw_ts = record.get(0).unwrap_or("");
        let ts = parse_cached_timestamp(raw_ts).ok_or_else(|| CompileError::Format {
            path: path.to_path_buf(),
            line,
            value: raw_ts.to_string(),
            expected: CACHE_TIMESTAMP_FORMATS[0],
        })?;

        let raw_value = record.get(value_idx).unwrap_or("");
        let value = parse_decimal(raw_value, '.').ok_or_else(|| CompileError::Value {
            path: path.to_path_buf(),
            line,
            value: raw_value.to_string(),
        })?;

        series.push(ts, value);
    }

    tracing::info!(path = %path.display(), rows = series.len(), "loaded cached series");
    Ok(series)
}

fn parse_cached_timestamp(s: &str) -> Option<NaiveDateTime> {
    for fmt in CACHE_TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    // Daily series are written by pandas without a time part.
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
