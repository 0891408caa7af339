use std::path::Path;

use crs_scores::{Average, ExtractOptions, SUMMARY_FILE_NAME, ScoresError, extract_tree};
use pretty_assertions::assert_eq;

const FIRST_REVIEW: &str = "\
# Code Review

## Scores
- Correctness and Functionality
  8/10
- Code Quality and Maintainability: 6/10

Overall Score: 7.14/10

Key Improvement Items:
1. Validate the input payload
2. Add a timeout to the SAP call
";

const SECOND_REVIEW: &str = "\
Correctness and Functionality: 9/10
Overall Score: 8/10
";

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn mirrors_reviews_as_json_and_writes_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("docs/otc");
    let output = dir.path().join("docs/extracted_scores");
    write(&input, "sapmiddleware/code-review-scores/2024-01.md", FIRST_REVIEW.as_bytes());
    write(&input, "hr/payroll/docs/code-review-scores/2024-02.md", SECOND_REVIEW.as_bytes());
    write(&input, "hr/payroll/docs/code-review-scores/notes.txt", b"ignored");

    let report = extract_tree(&ExtractOptions::new(&input, &output)).unwrap();

    assert_eq!(report.files_extracted, 2);
    assert!(report.failed_files.is_empty());

    let first = read_json(&output.join("sapmiddleware/code-review-scores/2024-01.json"));
    assert_eq!(first["Correctness and Functionality"], 8);
    assert_eq!(first["Code Quality and Maintainability"], 6);
    assert_eq!(first["Security and Vulnerability Assessment"], serde_json::Value::Null);
    assert_eq!(first["Overall Score"], "7.14/10");
    assert_eq!(
        first["Key Improvement Items"],
        serde_json::json!(["Validate the input payload", "Add a timeout to the SAP call"])
    );
    assert_eq!(first["Full Markdown Data"]["main"], "");
    assert!(first["Full Markdown Data"]["Scores"].is_string());
    assert!(!output.join("hr/payroll/docs/code-review-scores/notes.json").exists());

    let summary = read_json(&output.join(SUMMARY_FILE_NAME));
    assert_eq!(summary["Correctness and Functionality"], 8.5);
    assert_eq!(summary["Code Quality and Maintainability"], 6.0);
    assert_eq!(summary["Overall Score"], 7.57);
    assert_eq!(summary["Scalability and Extensibility"], "N/A");
    assert_eq!(
        summary["Metadata"],
        serde_json::json!({
            "Total Files Processed": 2,
            "Total Projects": 2,
            "Projects List": ["hr/payroll/docs", "sapmiddleware"],
        })
    );
    assert_eq!(report.summary.overall, Average::Value(7.57));
}

#[test]
fn output_inside_input_is_not_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("docs");
    let output = input.join("extracted_scores");
    write(&input, "otc/sap/code-review-scores/a.md", SECOND_REVIEW.as_bytes());
    write(&output, "stale/code-review-scores/old.md", FIRST_REVIEW.as_bytes());

    let report = extract_tree(&ExtractOptions::new(&input, &output)).unwrap();

    assert_eq!(report.files_extracted, 1);
    assert_eq!(report.summary.metadata.projects, ["otc/sap"]);
}

#[test]
fn unreadable_file_is_reported_and_others_continue() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("docs");
    let output = dir.path().join("out");
    write(&input, "otc/sap/code-review-scores/a-broken.md", b"\xFF\xFE not utf-8");
    write(&input, "otc/sap/code-review-scores/b.md", SECOND_REVIEW.as_bytes());

    let report = extract_tree(&ExtractOptions::new(&input, &output)).unwrap();

    assert_eq!(report.files_extracted, 1);
    assert_eq!(report.failed_files.len(), 1);
    assert!(report.failed_files[0].path.ends_with("a-broken.md"));
    assert!(output.join("otc/sap/code-review-scores/b.json").exists());
    assert_eq!(report.summary.metadata.total_files, 1);
}

#[test]
fn empty_input_still_writes_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("docs");
    std::fs::create_dir_all(&input).unwrap();
    let output = dir.path().join("out");

    let report = extract_tree(&ExtractOptions::new(&input, &output)).unwrap();

    assert_eq!(report.files_extracted, 0);
    let summary = read_json(&report.summary_path);
    assert_eq!(summary["Overall Score"], "N/A");
    assert_eq!(summary["Metadata"]["Total Projects"], 0);
}

#[test]
fn summary_that_cannot_be_written_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("docs");
    std::fs::create_dir_all(&input).unwrap();
    let output = dir.path().join("out");
    // A directory where the summary file should go.
    std::fs::create_dir_all(output.join(SUMMARY_FILE_NAME)).unwrap();

    let err = extract_tree(&ExtractOptions::new(&input, &output)).unwrap_err();

    assert!(matches!(err, ScoresError::Io { .. }));
}
