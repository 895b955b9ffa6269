//! Write a compiled series to CSV.
//!
//! Layout: header `<index label>,Energia`, one row per timestamp, values in
//! shortest round-trip form so a reload yields the same numbers.

use std::fs::{self, File};
use std::path::Path;

use crate::domain::{ENERGY_COLUMN, EnergySeries, OUTPUT_TIMESTAMP_FORMAT};
use crate::error::CompileError;

/// Write `series` to `path`, creating parent directories and overwriting any
/// existing file.
pub fn write_series_csv(path: &Path, series: &EnergySeries) -> Result<(), CompileError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CompileError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| CompileError::io(path, e))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record([series.index_label.as_str(), ENERGY_COLUMN])
        .map_err(|e| CompileError::csv(path, e))?;

    for (ts, value) in series.rows() {
        let value = if value.is_nan() {
            String::new()
        } else {
            value.to_string()
        };
        writer
            .write_record([ts.format(OUTPUT_TIMESTAMP_FORMAT).to_string(), value])
            .map_err(|e| CompileError::csv(path, e))?;
    }

    writer.flush().map_err(|e| CompileError::io(path, e))?;
    tracing::info!(path = %path.display(), rows = series.len(), "wrote compiled series");
    Ok(())
}
