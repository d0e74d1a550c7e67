//! Reject capture - JSONL writer for rows skipped during a batch run
//!
//! One record per rejected row using a unified schema: ts, site, row,
//! field, kind, message, raw. Lets a batch be diagnosed offline without
//! re-running it. Write failures degrade to a warning and never abort the
//! batch.

use chrono::Utc;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::domain::MeasurementError;

/// Unified reject record schema
#[derive(Debug, Serialize)]
pub struct RejectRecord<'a> {
    /// Capture timestamp (ISO 8601)
    pub ts: &'a str,
    /// Site identifier
    pub site: &'a str,
    /// 1-based input line number
    pub row: u64,
    /// Offending field name
    pub field: &'a str,
    /// Failure kind: "not_a_number" or "not_positive"
    pub kind: &'a str,
    /// Human-readable message
    pub message: String,
    /// Raw input line as read
    pub raw: &'a str,
}

/// JSONL reject writer with a date-stamped filename
///
/// The file is opened lazily on the first reject, so clean runs leave no
/// log behind.
pub struct RejectLog {
    log_dir: PathBuf,
    site_id: String,
    writer: Option<BufWriter<File>>,
    file_path: Option<PathBuf>,
}

impl RejectLog {
    pub fn new(log_dir: impl AsRef<Path>, site_id: impl Into<String>) -> Self {
        Self {
            log_dir: log_dir.as_ref().to_path_buf(),
            site_id: site_id.into(),
            writer: None,
            file_path: None,
        }
    }

    /// Path of the open reject file, if any row has been captured
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn get_writer(&mut self) -> std::io::Result<&mut BufWriter<File>> {
        if self.writer.is_none() {
            fs::create_dir_all(&self.log_dir)?;

            let filename = format!("rejects-{}.jsonl", Utc::now().format("%Y%m%d"));
            let file_path = self.log_dir.join(filename);
            let file = OpenOptions::new().create(true).append(true).open(&file_path)?;

            info!(path = %file_path.display(), "opened_reject_log");
            self.file_path = Some(file_path);
            self.writer = Some(BufWriter::new(file));
        }

        Ok(self.writer.as_mut().expect("writer just initialized"))
    }

    /// Capture one rejected row
    pub fn log_reject(&mut self, row: u64, raw: &str, err: &MeasurementError) {
        let ts = Utc::now().to_rfc3339();
        let site = self.site_id.clone();

        let record = RejectRecord {
            ts: &ts,
            site: &site,
            row,
            field: err.field().as_str(),
            kind: err.kind_str(),
            message: err.to_string(),
            raw,
        };

        if let Err(e) = self.write_record(&record) {
            warn!(row = row, error = %e, "reject_log_failed");
        } else {
            debug!(row = row, field = record.field, kind = record.kind, "row_captured");
        }
    }

    fn write_record<T: Serialize>(&mut self, record: &T) -> std::io::Result<()> {
        let json = serde_json::to_string(record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        let writer = self.get_writer()?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        Ok(())
    }

    /// Flush the writer if it was opened
    pub fn flush(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            if let Err(e) = writer.flush() {
                warn!(error = %e, "flush_failed");
            }
        }
    }
}
