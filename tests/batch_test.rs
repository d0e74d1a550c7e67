//! End-to-end tests for the batch classification runner

use sorter_poc::infra::{Config, Metrics, OnError};
use sorter_poc::services::BatchRunner;
use std::sync::Arc;
use tempfile::TempDir;

/// Write an input table, run a batch over it, and return the work directory
/// together with the run result.
fn run_batch(
    input_csv: &str,
    on_error: OnError,
) -> (TempDir, anyhow::Result<sorter_poc::services::BatchOutcome>, Arc<Metrics>) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.csv");
    let output = dir.path().join("output.csv");
    std::fs::write(&input, input_csv).unwrap();

    let config = Config::default()
        .with_on_error(on_error)
        .with_reject_dir(dir.path().join("logs").display().to_string());

    let metrics = Arc::new(Metrics::new());
    let runner = BatchRunner::new(config, metrics.clone());
    let result = runner.run(&input, &output);

    (dir, result, metrics)
}

fn read_output(dir: &TempDir) -> Vec<String> {
    std::fs::read_to_string(dir.path().join("output.csv"))
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

#[test]
fn test_batch_appends_classification() {
    let input = "width,height,length,mass\n\
                 30,20,40,2\n\
                 100,100,100,15\n\
                 150,50,50,25\n\
                 50,50,50,20\n";

    let (dir, result, metrics) = run_batch(input, OnError::Skip);
    let outcome = result.unwrap();

    assert_eq!(outcome.rows_read, 4);
    assert_eq!(outcome.rows_written, 4);
    assert_eq!(outcome.rows_skipped, 0);

    let lines = read_output(&dir);
    assert_eq!(lines[0], "width,height,length,mass,classification");
    assert_eq!(lines[1], "30,20,40,2,STANDARD");
    assert_eq!(lines[2], "100,100,100,15,SPECIAL");
    assert_eq!(lines[3], "150,50,50,25,REJECTED");
    assert_eq!(lines[4], "50,50,50,20,SPECIAL");

    assert_eq!(metrics.rows_total(), 4);
    assert_eq!(metrics.invalid_total(), 0);
}

#[test]
fn test_extra_columns_pass_through() {
    let input = "id,width,height,length,mass,notes\n\
                 P-1,30,20,40,2,fragile\n\
                 P-2,150,50,50,25,\n";

    let (dir, result, _) = run_batch(input, OnError::Skip);
    result.unwrap();

    let lines = read_output(&dir);
    assert_eq!(lines[0], "id,width,height,length,mass,notes,classification");
    assert_eq!(lines[1], "P-1,30,20,40,2,fragile,STANDARD");
    assert_eq!(lines[2], "P-2,150,50,50,25,,REJECTED");
}

#[test]
fn test_quoted_numeric_cells_accepted() {
    let input = "width,height,length,mass\n\
                 \"100\",50,50,10\n";

    let (dir, result, _) = run_batch(input, OnError::Skip);
    assert_eq!(result.unwrap().rows_written, 1);

    let lines = read_output(&dir);
    assert_eq!(lines[1], "100,50,50,10,STANDARD");
}

#[test]
fn test_skip_policy_drops_bad_rows() {
    let input = "width,height,length,mass\n\
                 30,20,40,2\n\
                 -10,50,50,10\n\
                 abc,50,50,10\n\
                 50,50,50,20\n";

    let (dir, result, metrics) = run_batch(input, OnError::Skip);
    let outcome = result.unwrap();

    assert_eq!(outcome.rows_read, 4);
    assert_eq!(outcome.rows_written, 2);
    assert_eq!(outcome.rows_skipped, 2);
    assert_eq!(metrics.invalid_total(), 2);

    // Only the good rows survive, order preserved
    let lines = read_output(&dir);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[1], "30,20,40,2,STANDARD");
    assert_eq!(lines[2], "50,50,50,20,SPECIAL");

    // Both rejects are captured with field and kind
    let logs_dir = dir.path().join("logs");
    let reject_file = std::fs::read_dir(&logs_dir)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let content = std::fs::read_to_string(reject_file).unwrap();
    let records: Vec<serde_json::Value> =
        content.lines().map(|l| serde_json::from_str(l).unwrap()).collect();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["row"], 3);
    assert_eq!(records[0]["field"], "width");
    assert_eq!(records[0]["kind"], "not_positive");
    assert_eq!(records[0]["raw"], "-10,50,50,10");
    assert_eq!(records[1]["row"], 4);
    assert_eq!(records[1]["kind"], "not_a_number");
}

#[test]
fn test_abort_policy_fails_on_first_bad_row() {
    let input = "width,height,length,mass\n\
                 30,20,40,2\n\
                 -10,50,50,10\n\
                 50,50,50,20\n";

    let (_dir, result, metrics) = run_batch(input, OnError::Abort);
    let err = result.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Row 3"), "unexpected error: {message}");
    assert!(message.contains("width must be positive"), "unexpected error: {message}");

    // The row before the failure was still classified
    assert_eq!(metrics.rows_total(), 1);
    assert_eq!(metrics.invalid_total(), 1);
}

#[test]
fn test_missing_column_is_importer_error() {
    let input = "width,height,length\n\
                 30,20,40\n";

    let (_dir, result, metrics) = run_batch(input, OnError::Skip);
    let err = result.unwrap_err();

    assert!(err.to_string().contains("mass"), "unexpected error: {err}");
    // Nothing was classified; header validation failed before any row
    assert_eq!(metrics.rows_total(), 0);
}

#[test]
fn test_columns_located_by_name_not_position() {
    let input = "mass,length,height,width\n\
                 25,50,50,150\n";

    let (dir, result, _) = run_batch(input, OnError::Skip);
    result.unwrap();

    let lines = read_output(&dir);
    assert_eq!(lines[0], "mass,length,height,width,classification");
    assert_eq!(lines[1], "25,50,50,150,REJECTED");
}
