//! Append-only audit trail of verification outcomes.
//!
//! One CSV file with columns `record_id,result`, `result` written as `TRUE`
//! or `FALSE` (`TRUE` = claimed facts matched). The header row is written
//! exactly once, when the file is first created; existing rows are never
//! rewritten.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::verification::verdict::Verdict;

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("failed to open audit log: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to append audit row: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row for a verdict, creating the log with its header on
    /// first use.
    pub fn record(&self, verdict: &Verdict) -> Result<(), AuditError> {
        self.record_raw(&verdict.record_id, verdict.passed)
    }

    pub fn record_raw(&self, record_id: &str, passed: bool) -> Result<(), AuditError> {
        let is_new = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if is_new {
            writer.write_record(["record_id", "result"])?;
        }
        writer.write_record([record_id, if passed { "TRUE" } else { "FALSE" }])?;
        writer.flush().map_err(AuditError::Io)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verification::verdict::Verdict;

    fn log_in_tempdir() -> (tempfile::TempDir, AuditLog) {
        let dir = tempfile::tempdir().expect("temp dir");
        let log = AuditLog::new(dir.path().join("fact_check_results.csv"));
        (dir, log)
    }

    #[test]
    fn header_is_written_exactly_once() {
        let (_dir, log) = log_in_tempdir();

        log.record_raw("clip-1", true).expect("first append");
        log.record_raw("clip-2", false).expect("second append");
        log.record_raw("clip-3", true).expect("third append");

        let contents = std::fs::read_to_string(log.path()).expect("log readable");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "record_id,result");
        assert_eq!(
            lines,
            vec![
                "record_id,result",
                "clip-1,TRUE",
                "clip-2,FALSE",
                "clip-3,TRUE",
            ]
        );
    }

    #[test]
    fn existing_rows_are_never_rewritten() {
        let (_dir, log) = log_in_tempdir();

        log.record_raw("clip-1", true).expect("append");
        let before = std::fs::read_to_string(log.path()).expect("log readable");

        log.record_raw("clip-2", false).expect("append");
        let after = std::fs::read_to_string(log.path()).expect("log readable");
        assert!(after.starts_with(&before));
    }

    #[test]
    fn record_uses_the_verdict_polarity() {
        let (_dir, log) = log_in_tempdir();

        log.record(&Verdict::indeterminate("clip-9", "no client record"))
            .expect("append");

        let contents = std::fs::read_to_string(log.path()).expect("log readable");
        assert!(contents.contains("clip-9,FALSE"));
    }
}
