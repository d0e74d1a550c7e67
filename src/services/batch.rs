//! Batch classification runner
//!
//! Streams a delimited table through the classifier and writes the
//! augmented table with the classification column appended. Every row is
//! classified independently; a row failure follows the configured policy:
//! skip (drop the row, capture it in the reject log, keep going) or abort
//! (fail the run with row context).

use anyhow::{bail, Context};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::domain::{classify, Classification, Field, MeasurementError};
use crate::infra::{Config, Metrics, OnError};
use crate::io::reject_log::RejectLog;
use crate::io::table::{TableReader, TableRow, TableWriter};

/// Counts for one completed batch run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub rows_read: u64,
    pub rows_written: u64,
    pub rows_skipped: u64,
}

pub struct BatchRunner {
    config: Config,
    metrics: Arc<Metrics>,
}

impl BatchRunner {
    pub fn new(config: Config, metrics: Arc<Metrics>) -> Self {
        Self { config, metrics }
    }

    /// Run one batch: read the input table, classify every row, write the
    /// augmented output table.
    pub fn run(&self, input: &Path, output: &Path) -> anyhow::Result<BatchOutcome> {
        let delimiter = self.config.batch_delimiter();
        let mut reader = TableReader::open(input, delimiter)?;
        let mut writer = TableWriter::create(output, delimiter)?;

        writer
            .write_header(reader.header())
            .with_context(|| format!("Failed to write {}", output.display()))?;

        let mut reject_log =
            RejectLog::new(self.config.batch_reject_dir(), self.config.site_id());
        let measure_indices = reader.measure_indices();
        let mut outcome = BatchOutcome::default();

        while let Some(row) = reader.next_row() {
            let row = row.with_context(|| format!("Failed to read {}", input.display()))?;
            outcome.rows_read += 1;

            let start = Instant::now();
            match classify_row(&row, measure_indices) {
                Ok(classification) => {
                    self.metrics
                        .record_classified(classification, start.elapsed().as_nanos() as u64);
                    writer
                        .write_row(&row.fields, classification.as_str())
                        .with_context(|| format!("Failed to write {}", output.display()))?;
                    outcome.rows_written += 1;
                }
                Err(err) => {
                    self.metrics.record_invalid();
                    match self.config.batch_on_error() {
                        OnError::Skip => {
                            warn!(
                                row = row.line_no,
                                field = err.field().as_str(),
                                kind = err.kind_str(),
                                "row_skipped"
                            );
                            reject_log.log_reject(row.line_no, &row.raw, &err);
                            outcome.rows_skipped += 1;
                        }
                        OnError::Abort => {
                            bail!("Row {} of {}: {}", row.line_no, input.display(), err);
                        }
                    }
                }
            }
        }

        writer.flush().with_context(|| format!("Failed to write {}", output.display()))?;
        reject_log.flush();

        info!(
            rows_read = outcome.rows_read,
            rows_written = outcome.rows_written,
            rows_skipped = outcome.rows_skipped,
            "batch_complete"
        );

        Ok(outcome)
    }
}

/// Parse the four measurement cells of a row and classify.
///
/// A missing, empty, or unparseable cell maps to the same TypeKind failure
/// the core itself reports for a non-numeric value, so the error vocabulary
/// is identical for typed and textual callers.
fn classify_row(
    row: &TableRow,
    measure_indices: [usize; 4],
) -> Result<Classification, MeasurementError> {
    let mut values = [0.0f64; 4];

    for ((field, idx), slot) in Field::ORDERED.into_iter().zip(measure_indices).zip(&mut values) {
        let cell = row.fields.get(idx).map(|s| s.trim()).unwrap_or("");
        *slot = cell.parse::<f64>().map_err(|_| MeasurementError::NotANumber(field))?;
    }

    classify(values[0], values[1], values[2], values[3])
}
