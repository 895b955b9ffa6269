//! Shared domain types.
//!
//! These types are intentionally kept small and serializable so they can be:
//!
//! - passed between the selector, normalizer and compiler
//! - printed as JSON summaries
//! - configured from the CLI without translation layers

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::CompileError;

/// Name of the normalized value column (megawatts).
pub const ENERGY_COLUMN: &str = "Energia";

/// Timestamp layout of the raw measurement index (`DD/MM/YY HH:MM`).
pub const RAW_TIMESTAMP_FORMAT: &str = "%d/%m/%y %H:%M";

/// Timestamp layout written to the compiled output.
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Dataset tag used when none is given.
pub const DEFAULT_DATASET_TAG: &str = "Solcast";

/// Default high-voltage transformer loss (0.3%).
pub const DEFAULT_TRANSFORMER_LOSS: f64 = 0.003;

/// Default high-voltage transmission line loss (1%).
pub const DEFAULT_LINE_LOSS: f64 = 0.01;

/// What to do when a compiled output already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Rebuild the series from the raw files and overwrite the output.
    Reprocess,
    /// Load the existing output as-is.
    Reuse,
}

/// How matched raw files are ordered before concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileOrder {
    /// Sort by the first 4-digit year token in the file name.
    ///
    /// Files without a token go last; ties fall back to the file name.
    #[default]
    Period,
    /// Keep the order the directory listing yields.
    Discovery,
}

/// Text encoding of a raw file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    /// ISO-8859-1: every byte is the code point of the same value.
    Latin1,
    Utf8,
}

/// Layout of a raw measurement file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFormat {
    pub delimiter: u8,
    /// Leading lines dropped before anything else is read.
    pub skip_rows: usize,
    /// Extra lines between the skipped block and the header row.
    pub header_offset: usize,
    pub decimal: char,
    pub encoding: TextEncoding,
    /// Position of the timestamp column.
    pub index_column: usize,
    /// Header label of the raw value column (renamed to [`ENERGY_COLUMN`]).
    pub value_column: String,
}

impl RawFormat {
    /// The layout of the yearly generation exports.
    pub fn measurement_export() -> Self {
        Self {
            delimiter: b';',
            skip_rows: 11,
            header_offset: 0,
            decimal: ',',
            encoding: TextEncoding::Latin1,
            index_column: 0,
            value_column: "kW".to_string(),
        }
    }
}

impl Default for RawFormat {
    fn default() -> Self {
        Self::measurement_export()
    }
}

/// Cascading technical losses between the plant and the delivery point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossProfile {
    /// High-voltage transformer loss rate, in `[0, 1)`.
    pub transformer: f64,
    /// Transmission line loss rate, in `[0, 1)`.
    pub line: f64,
}

impl LossProfile {
    /// Build a validated profile.
    pub fn new(transformer: f64, line: f64) -> Result<Self, CompileError> {
        let profile = Self { transformer, line };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), CompileError> {
        check_rate("transformer", self.transformer)?;
        check_rate("line", self.line)
    }

    /// Combined multiplier `(1 - transformer) * (1 - line)`.
    pub fn multiplier(&self) -> f64 {
        (1.0 - self.transformer) * (1.0 - self.line)
    }
}

impl Default for LossProfile {
    fn default() -> Self {
        Self {
            transformer: DEFAULT_TRANSFORMER_LOSS,
            line: DEFAULT_LINE_LOSS,
        }
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), CompileError> {
    if value.is_finite() && (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(CompileError::InvalidLossRate { name, value })
    }
}

/// A time-indexed series with a single `Energia` column (MW).
///
/// Missing readings are stored as `NaN`. The index is kept in row order and may
/// contain duplicates or gaps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnergySeries {
    /// Label of the index column, as found in the source header.
    pub index_label: String,
    pub index: Vec<NaiveDateTime>,
    pub energy: Vec<f64>,
}

impl EnergySeries {
    pub fn new(index_label: impl Into<String>) -> Self {
        Self {
            index_label: index_label.into(),
            index: Vec::new(),
            energy: Vec::new(),
        }
    }

    pub fn push(&mut self, timestamp: NaiveDateTime, value: f64) {
        self.index.push(timestamp);
        self.energy.push(value);
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Append all rows of `other` after the rows of `self`.
    ///
    /// The first non-empty index label wins.
    pub fn append(&mut self, other: EnergySeries) {
        if self.index_label.is_empty() {
            self.index_label = other.index_label;
        }
        self.index.extend(other.index);
        self.energy.extend(other.energy);
    }

    /// Multiply every value by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.energy {
            *v *= factor;
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.index.iter().copied().zip(self.energy.iter().copied())
    }
}

/// Inputs of one compilation run.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    pub source_dir: PathBuf,
    pub dataset_tag: String,
    pub losses: LossProfile,
    /// Write the compiled series to the output path.
    pub persist: bool,
    /// Directory under which `data/output/` lives.
    pub output_root: PathBuf,
    pub file_order: FileOrder,
}

impl CompileRequest {
    pub fn new(source_dir: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dataset_tag: DEFAULT_DATASET_TAG.to_string(),
            losses: LossProfile::default(),
            persist: false,
            output_root: output_root.into(),
            file_order: FileOrder::default(),
        }
    }

    /// Deterministic location of the compiled output for this tag.
    pub fn output_path(&self) -> PathBuf {
        self.output_root
            .join("data")
            .join("output")
            .join(format!("dados_compilados_{}.csv", self.dataset_tag))
    }
}

/// Where a returned series came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Provenance {
    /// Built from raw files during this call.
    Compiled {
        files: Vec<PathBuf>,
        persisted: Option<PathBuf>,
    },
    /// Read back from a previously persisted output.
    Cached { path: PathBuf },
}

/// Result of [`crate::app::pipeline::compile`].
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    pub series: EnergySeries,
    pub provenance: Provenance,
}
