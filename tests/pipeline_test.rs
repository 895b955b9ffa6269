//! End-to-end compilation over a directory of yearly exports.

use std::fs;
use std::path::Path;

use approx::assert_relative_eq;
use energy_compiler::app::gate::DecisionSource;
use energy_compiler::app::pipeline::compile;
use energy_compiler::domain::{CompileRequest, Decision, LossProfile, Provenance};
use energy_compiler::error::CompileError;
use energy_compiler::io::read_series_csv;

/// Write a raw export: 11 latin-1 preamble lines, header, then `rows`.
fn write_export(dir: &Path, name: &str, rows: &[&str]) {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"Usina Solar S\xe3o Jo\xe3o\r\n");
    for i in 1..11 {
        bytes.extend_from_slice(format!("Linha {i};;\r\n").as_bytes());
    }
    bytes.extend_from_slice(b"Data/Hora;kW\r\n");
    for row in rows {
        bytes.extend_from_slice(row.as_bytes());
        bytes.extend_from_slice(b"\r\n");
    }
    fs::write(dir.join(name), bytes).unwrap();
}

/// Fails the test if it is ever asked.
struct NeverAsked;

impl DecisionSource for NeverAsked {
    fn decide(&mut self, output: &Path) -> Result<Decision, CompileError> {
        panic!("decision requested for {}", output.display());
    }
}

#[test]
fn compile_persist_then_reuse_round_trips() {
    let raw = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    write_export(
        raw.path(),
        "Solcast_2020.csv",
        &["31/12/20 23:00;-50", "31/12/20 23:30;1234,56"],
    );
    write_export(raw.path(), "Solcast_2021.csv", &["01/01/21 12:00;500000"]);
    write_export(raw.path(), "Outra_2021.csv", &["01/01/21 12:00;1"]);

    let mut request = CompileRequest::new(raw.path(), root.path());
    request.persist = true;

    // No output yet: the decision source must not be consulted.
    let first = compile(&request, &mut NeverAsked).unwrap();
    let expected_path = root.path().join("data/output/dados_compilados_Solcast.csv");
    assert_eq!(
        first.provenance,
        Provenance::Compiled {
            files: vec![raw.path().join("Solcast_2020.csv"), raw.path().join("Solcast_2021.csv")],
            persisted: Some(expected_path.clone()),
        }
    );

    let series = &first.series;
    assert_eq!(series.index_label, "Data/Hora");
    assert_eq!(series.len(), 3);
    assert_eq!(series.energy[0], 0.0);
    assert_relative_eq!(series.energy[1], 1.23456 * 0.997 * 0.99, epsilon = 1e-12);
    assert_relative_eq!(series.energy[2], 493.515, epsilon = 1e-9);

    // Reuse reads back exactly what was written.
    let reused = compile(&request, &mut Decision::Reuse).unwrap();
    assert_eq!(reused.provenance, Provenance::Cached { path: expected_path.clone() });
    assert_eq!(&reused.series, series);
    assert_eq!(read_series_csv(&expected_path).unwrap(), *series);
}

#[test]
fn reuse_never_reads_raw_directory() {
    let raw = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    write_export(raw.path(), "Solcast_2020.csv", &["01/01/20 12:00;500000"]);

    let mut request = CompileRequest::new(raw.path(), root.path());
    request.persist = true;
    compile(&request, &mut Decision::Reprocess).unwrap();

    // Corrupt the raw input; reuse must not notice.
    write_export(raw.path(), "Solcast_2020.csv", &["not a date;1"]);
    let reused = compile(&request, &mut Decision::Reuse).unwrap();
    assert_eq!(reused.series.len(), 1);

    // Reprocess does read it, and fails on the bad timestamp.
    let err = compile(&request, &mut Decision::Reprocess).unwrap_err();
    assert!(matches!(err, CompileError::Format { .. }), "{err}");
}

#[test]
fn reuse_with_missing_output_is_an_error_not_a_recompile() {
    struct DeleteThenReuse;

    impl DecisionSource for DeleteThenReuse {
        fn decide(&mut self, output: &Path) -> Result<Decision, CompileError> {
            // Simulate the output vanishing between the check and the read.
            fs::remove_file(output).unwrap();
            Ok(Decision::Reuse)
        }
    }

    let raw = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    let request = CompileRequest::new(raw.path(), root.path());
    let output = request.output_path();
    fs::create_dir_all(output.parent().unwrap()).unwrap();
    fs::write(&output, "Data,Energia\n").unwrap();

    let err = compile(&request, &mut DeleteThenReuse).unwrap_err();
    assert!(matches!(err, CompileError::MissingOutput(ref p) if *p == output));
}

#[test]
fn empty_tag_match_persists_an_empty_series() {
    let raw = tempfile::tempdir().unwrap();
    let root = tempfile::tempdir().unwrap();
    write_export(raw.path(), "Outra_2020.csv", &["01/01/20 12:00;1"]);

    let mut request = CompileRequest::new(raw.path(), root.path());
    request.persist = true;
    request.losses = LossProfile::new(0.1, 0.2).unwrap();

    let out = compile(&request, &mut NeverAsked).unwrap();
    assert!(out.series.is_empty());
    assert!(read_series_csv(&request.output_path()).unwrap().is_empty());
}
