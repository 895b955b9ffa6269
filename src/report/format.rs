//! Formatted terminal output.
//!
//! We keep formatting code in one place so output changes stay localized.

use std::path::PathBuf;

use crate::domain::{CompileOutcome, OUTPUT_TIMESTAMP_FORMAT, Provenance};
use crate::report::summarize;

/// Format the run summary printed after `compile`.
pub fn format_run_summary(tag: &str, multiplier: f64, outcome: &CompileOutcome) -> String {
    let summary = summarize(&outcome.series);
    let mut out = String::new();

    out.push_str(&format!("=== compiled series: {tag} ===\n"));
    match &outcome.provenance {
        Provenance::Compiled { files, persisted } => {
            out.push_str(&format!("Source: {} raw file(s)\n", files.len()));
            for f in files {
                out.push_str(&format!("  - {}\n", f.display()));
            }
            out.push_str(&format!("Loss multiplier: {multiplier:.6}\n"));
            match persisted {
                Some(path) => out.push_str(&format!("Saved: {}\n", path.display())),
                None => out.push_str("Saved: no\n"),
            }
        }
        Provenance::Cached { path } => {
            out.push_str(&format!("Source: cached output {}\n", path.display()));
        }
    }

    out.push_str(&format!("Rows: {}\n", summary.rows));
    if let (Some(first), Some(last)) = (summary.first, summary.last) {
        out.push_str(&format!(
            "Span: {} .. {}\n",
            first.format(OUTPUT_TIMESTAMP_FORMAT),
            last.format(OUTPUT_TIMESTAMP_FORMAT)
        ));
    }
    if summary.duplicate_timestamps > 0 {
        out.push_str(&format!("Duplicate timestamps: {}\n", summary.duplicate_timestamps));
    }
    if summary.missing_values > 0 {
        out.push_str(&format!("Missing values: {}\n", summary.missing_values));
    }
    if let (Some(peak), Some(mean)) = (summary.peak_mw, summary.mean_mw) {
        out.push_str(&format!("Energia: peak={peak:.3} MW mean={mean:.3} MW\n"));
    }

    out
}

/// Format the file list printed by `list`.
pub fn format_file_list(tag: &str, files: &[PathBuf]) -> String {
    if files.is_empty() {
        return format!("No files match '{tag}'.\n");
    }
    let mut out = format!("{} file(s) match '{tag}':\n", files.len());
    for (idx, path) in files.iter().enumerate() {
        out.push_str(&format!("{:>3}) {}\n", idx + 1, path.display()));
    }
    out
}
