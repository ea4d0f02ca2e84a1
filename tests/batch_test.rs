//! Integration tests for directory batch runs.

mod common;

use std::fs;
use std::path::Path;

use common::{body, build_pdf, sample_report};
use pdf_outline::batch::{collect_inputs, run_batch, run_batch_with_progress};
use pdf_outline::{BatchOptions, DocumentOutcome, Error, JsonFormat, OutlineDocument};
use tempfile::TempDir;

/// Input directory with one good, one blank and one corrupt PDF plus a
/// non-PDF file.
fn populate(dir: &Path) {
    fs::write(dir.join("report.pdf"), sample_report()).unwrap();
    fs::write(dir.join("blank.pdf"), build_pdf(&[vec![]])).unwrap();
    fs::write(dir.join("broken.pdf"), b"%PDF-1.7\nthis is not a pdf body").unwrap();
    fs::write(dir.join("readme.txt"), b"not an input").unwrap();
}

fn options(out: &Path) -> BatchOptions {
    BatchOptions::new().with_output_dir(out)
}

#[test]
fn test_batch_outcomes() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("pdfs");
    let output = tmp.path().join("out");
    fs::create_dir(&input).unwrap();
    populate(&input);

    let report = run_batch(&input, &options(&output)).unwrap();

    let names: Vec<String> = report
        .documents
        .iter()
        .map(|d| d.input.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["blank.pdf", "broken.pdf", "report.pdf"]);

    assert_eq!(report.written(), 1);
    assert_eq!(report.empty(), 1);
    assert_eq!(report.failed(), 1);
    assert!(matches!(report.documents[0].outcome, DocumentOutcome::Empty));
    assert!(matches!(report.documents[1].outcome, DocumentOutcome::Failed(_)));

    match &report.documents[2].outcome {
        DocumentOutcome::Written(path) => assert_eq!(path, &output.join("report.json")),
        other => panic!("unexpected outcome: {:?}", other),
    }

    let written: Vec<_> = fs::read_dir(&output).unwrap().collect();
    assert_eq!(written.len(), 1);
}

#[test]
fn test_written_json_shape() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("report.pdf");
    let output = tmp.path().join("out");
    fs::write(&input, sample_report()).unwrap();

    run_batch(&input, &options(&output)).unwrap();

    let json = fs::read_to_string(output.join("report.json")).unwrap();
    let outline: OutlineDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(outline.title, "Annual Report");
    assert_eq!(outline.len(), 5);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["outline"][0]["level"], "H1");
    assert_eq!(value["outline"][0]["page"], 1);
    assert_eq!(value["outline"][2]["text"], "1.1 Scope");
}

#[test]
fn test_parallel_matches_sequential() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("pdfs");
    fs::create_dir(&input).unwrap();
    for i in 0..4 {
        fs::write(input.join(format!("doc{}.pdf", i)), sample_report()).unwrap();
    }
    fs::write(
        input.join("notes.pdf"),
        build_pdf(&[body(&["Just a note.", "Nothing more."], 100.0)]),
    )
    .unwrap();

    let seq_out = tmp.path().join("seq");
    let par_out = tmp.path().join("par");
    let sequential = run_batch(&input, &options(&seq_out).with_parallel(false)).unwrap();
    let parallel = run_batch(&input, &options(&par_out).with_parallel(true)).unwrap();

    assert_eq!(sequential.written(), 5);
    assert_eq!(parallel.written(), 5);

    let seq_inputs: Vec<_> = sequential.documents.iter().map(|d| &d.input).collect();
    let par_inputs: Vec<_> = parallel.documents.iter().map(|d| &d.input).collect();
    assert_eq!(seq_inputs, par_inputs);

    for name in ["doc0.json", "doc3.json", "notes.json"] {
        assert_eq!(
            fs::read(seq_out.join(name)).unwrap(),
            fs::read(par_out.join(name)).unwrap()
        );
    }
}

#[test]
fn test_compact_format() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("notes.pdf");
    let output = tmp.path().join("out");
    fs::write(&input, build_pdf(&[body(&["Only body text here."], 100.0)])).unwrap();

    run_batch(&input, &options(&output).with_format(JsonFormat::Compact)).unwrap();

    let json = fs::read_to_string(output.join("notes.json")).unwrap();
    assert_eq!(json, r#"{"title":"Unknown Title","outline":[]}"#);
}

#[test]
fn test_output_failure_aborts() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("report.pdf");
    fs::write(&input, sample_report()).unwrap();

    // A file where the output directory should be
    let blocker = tmp.path().join("out");
    fs::write(&blocker, b"").unwrap();

    let err = run_batch(&input, &options(&blocker)).unwrap_err();
    assert!(matches!(err, Error::Output { .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_progress_callback_sees_every_document() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("pdfs");
    fs::create_dir(&input).unwrap();
    populate(&input);

    let seen = AtomicUsize::new(0);
    let inputs = collect_inputs(&input).unwrap();
    let report = run_batch_with_progress(&inputs, &options(&tmp.path().join("out")), |_, _| {
        seen.fetch_add(1, Ordering::Relaxed);
    })
    .unwrap();

    assert_eq!(seen.load(Ordering::Relaxed), 3);
    assert_eq!(report.documents.len(), 3);
}

#[test]
fn test_missing_input() {
    let tmp = TempDir::new().unwrap();
    let err = run_batch(&tmp.path().join("nope"), &options(&tmp.path().join("out"))).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
