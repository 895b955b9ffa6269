//! Reporting utilities: series statistics and formatted terminal output.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{CompileOutcome, EnergySeries, Provenance};

pub mod format;

pub use format::*;

/// Quick facts about a compiled series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub rows: usize,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
    /// Rows whose timestamp already appeared earlier (files overlapping).
    pub duplicate_timestamps: usize,
    /// Rows with no reading.
    pub missing_values: usize,
    pub peak_mw: Option<f64>,
    pub mean_mw: Option<f64>,
}

/// Summary plus where the series came from, as printed by `compile --json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport<'a> {
    pub dataset_tag: &'a str,
    pub multiplier: f64,
    pub provenance: &'a Provenance,
    pub summary: SeriesSummary,
}

/// Compute the summary in one pass over the series.
pub fn summarize(series: &EnergySeries) -> SeriesSummary {
    let mut seen = HashSet::with_capacity(series.len());
    let mut duplicate_timestamps = 0;
    let mut missing_values = 0;
    let mut peak: Option<f64> = None;
    let mut sum = 0.0;
    let mut n = 0usize;

    for (ts, value) in series.rows() {
        if !seen.insert(ts) {
            duplicate_timestamps += 1;
        }
        if value.is_nan() {
            missing_values += 1;
            continue;
        }
        peak = Some(peak.map_or(value, |p| p.max(value)));
        sum += value;
        n += 1;
    }

    SeriesSummary {
        rows: series.len(),
        first: series.index.first().copied(),
        last: series.index.last().copied(),
        duplicate_timestamps,
        missing_values,
        peak_mw: peak,
        mean_mw: (n > 0).then(|| sum / n as f64),
    }
}

pub fn run_report<'a>(tag: &'a str, multiplier: f64, outcome: &'a CompileOutcome) -> RunReport<'a> {
    RunReport {
        dataset_tag: tag,
        multiplier,
        provenance: &outcome.provenance,
        summary: summarize(&outcome.series),
    }
}
