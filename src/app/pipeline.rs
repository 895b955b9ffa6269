//! Shared compilation pipeline used by the CLI and by library callers.
//!
//! gate -> select -> normalize each file -> concatenate -> losses -> persist
//!
//! or, when the gate says reuse: read the persisted output as-is.

use std::path::PathBuf;

use crate::app::gate::{DecisionSource, should_compile};
use crate::domain::{CompileOutcome, CompileRequest, EnergySeries, LossProfile, Provenance, RawFormat};
use crate::error::CompileError;
use crate::io::{list_files, read_formatted, read_series_csv, write_series_csv};

/// Compile (or reuse) the series for `request.dataset_tag`.
///
/// `decisions` is consulted only when the output already exists, and always
/// before any raw file is opened.
pub fn compile(
    request: &CompileRequest,
    decisions: &mut dyn DecisionSource,
) -> Result<CompileOutcome, CompileError> {
    request.losses.validate()?;
    let output = request.output_path();

    if !should_compile(&output, decisions)? {
        let series = read_series_csv(&output)?;
        return Ok(CompileOutcome {
            series,
            provenance: Provenance::Cached { path: output },
        });
    }

    let files = list_files(&request.source_dir, &request.dataset_tag, request.file_order)?;
    if files.is_empty() {
        tracing::warn!(
            dir = %request.source_dir.display(),
            tag = %request.dataset_tag,
            "no raw files match the dataset tag; compiled series is empty"
        );
    }

    let series = compile_files(&files, &RawFormat::measurement_export(), &request.losses)?;

    let persisted = if request.persist {
        write_series_csv(&output, &series)?;
        Some(output)
    } else {
        None
    };

    tracing::info!(
        tag = %request.dataset_tag,
        files = files.len(),
        rows = series.len(),
        multiplier = request.losses.multiplier(),
        persisted = persisted.is_some(),
        "compiled series"
    );

    Ok(CompileOutcome {
        series,
        provenance: Provenance::Compiled { files, persisted },
    })
}

/// Normalize `files` in the given order, append them and apply `losses`.
///
/// The first failing file aborts the whole run; no partial series is returned.
pub fn compile_files(
    files: &[PathBuf],
    format: &RawFormat,
    losses: &LossProfile,
) -> Result<EnergySeries, CompileError> {
    losses.validate()?;

    let mut combined = EnergySeries::default();
    for path in files {
        let formatted = read_formatted(path, format)?;
        tracing::info!(file = %path.display(), rows = formatted.len(), "normalized raw file");
        combined.append(formatted);
    }

    combined.scale(losses.multiplier());
    Ok(combined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Decision, FileOrder};
    use approx::assert_relative_eq;
    use std::fs;
    use std::path::Path;

    fn write_raw(dir: &Path, name: &str, rows: &[&str]) {
        let mut text = String::new();
        for i in 0..11 {
            text.push_str(&format!("preamble {i}\n"));
        }
        text.push_str("Data;kW\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        fs::write(dir.join(name), text).unwrap();
    }

    fn request(src: &Path, root: &Path) -> CompileRequest {
        CompileRequest::new(src, root)
    }

    #[test]
    fn applies_losses_after_clamping() {
        let src = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        write_raw(src.path(), "Solcast_2020.csv", &["01/01/20 00:00;-50", "01/01/20 12:00;500000"]);

        let out = compile(&request(src.path(), root.path()), &mut Decision::Reprocess).unwrap();
        assert_eq!(out.series.energy[0], 0.0);
        assert_relative_eq!(out.series.energy[1], 500.0 * 0.997 * 0.99, epsilon = 1e-9);
        assert_relative_eq!(out.series.energy[1], 493.515, epsilon = 1e-9);
    }

    #[test]
    fn concatenates_in_period_order() {
        let src = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        write_raw(src.path(), "Solcast_2021.csv", &["01/01/21 00:00;2000"]);
        write_raw(src.path(), "Solcast_2020.csv", &["01/01/20 00:00;1000", "01/01/20 00:30;1000"]);
        write_raw(src.path(), "Outra_2020.csv", &["01/01/20 00:00;9999"]);

        let mut req = request(src.path(), root.path());
        req.losses = LossProfile::new(0.0, 0.0).unwrap();
        req.file_order = FileOrder::Period;

        let out = compile(&req, &mut Decision::Reprocess).unwrap();
        assert_eq!(out.series.energy, vec![1.0, 1.0, 2.0]);
        assert_eq!(out.series.index_label, "Data");
        let Provenance::Compiled { files, persisted } = out.provenance else {
            panic!("expected a compiled outcome");
        };
        assert_eq!(files.len(), 2);
        assert!(persisted.is_none());
        assert!(!req.output_path().exists());
    }

    #[test]
    fn empty_match_set_yields_empty_series() {
        let src = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        write_raw(src.path(), "Outra_2020.csv", &["01/01/20 00:00;1"]);

        let out = compile(&request(src.path(), root.path()), &mut Decision::Reprocess).unwrap();
        assert!(out.series.is_empty());
    }

    #[test]
    fn one_bad_file_aborts_the_run() {
        let src = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        write_raw(src.path(), "Solcast_2020.csv", &["01/01/20 00:00;1"]);
        write_raw(src.path(), "Solcast_2021.csv", &["2021-01-01 00:00;1"]);

        let mut req = request(src.path(), root.path());
        req.persist = true;
        let err = compile(&req, &mut Decision::Reprocess).unwrap_err();
        assert!(matches!(err, CompileError::Format { .. }));
        assert!(!req.output_path().exists());
    }

    #[test]
    fn invalid_losses_fail_before_the_gate() {
        let src = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let mut req = request(src.path(), root.path());
        req.losses = LossProfile { transformer: 1.5, line: 0.0 };

        let err = compile(&req, &mut Decision::Reprocess).unwrap_err();
        assert!(matches!(err, CompileError::InvalidLossRate { name: "transformer", .. }));
    }

    #[test]
    fn reuse_does_not_touch_raw_inputs() {
        let root = tempfile::tempdir().unwrap();
        let mut req = request(Path::new("/definitely/not/a/dir"), root.path());
        fs::create_dir_all(req.output_path().parent().unwrap()).unwrap();
        fs::write(req.output_path(), "Data,Energia\n2020-01-01 12:00:00,493.515\n").unwrap();
        // Losses must not be re-applied to cached values.
        req.losses = LossProfile::new(0.5, 0.5).unwrap();

        let out = compile(&req, &mut Decision::Reuse).unwrap();
        assert_eq!(out.series.energy, vec![493.515]);
        assert_eq!(out.provenance, Provenance::Cached { path: req.output_path() });
    }

    #[test]
    fn reprocess_rereads_raw_inputs() {
        let src = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        write_raw(src.path(), "Solcast_2020.csv", &["01/01/20 00:00;1000"]);

        let mut req = request(src.path(), root.path());
        req.persist = true;
        req.losses = LossProfile::new(0.0, 0.0).unwrap();
        compile(&req, &mut Decision::Reprocess).unwrap();

        write_raw(src.path(), "Solcast_2020.csv", &["01/01/20 00:00;3000"]);
        let again = compile(&req, &mut Decision::Reprocess).unwrap();
        assert_eq!(again.series.energy, vec![3.0]);
        assert_eq!(read_series_csv(&req.output_path()).unwrap().energy, vec![3.0]);
    }
}
