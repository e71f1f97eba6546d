//! Metrics report written by the training job.
//!
//! The report is newline-delimited JSON: one [`MetricsRecord`] per line,
//! train first, then test.

use crate::preprocessing::PreprocessingError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One line of the metrics report. Unknown fields are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub dataset: String,
    pub r2: f64,
    pub mse: f64,
    pub mad: f64,
}

impl MetricsRecord {
    /// Parses a single report line.
    ///
    /// ```
    /// use regression_grader::report::MetricsRecord;
    ///
    /// let line = r#"{"type": "metrics", "dataset": "train", "r2": 0.9, "mse": 5.0, "mad": 1.5, "n": 200}"#;
    /// let record = MetricsRecord::from_json_line(line).unwrap();
    /// assert_eq!(record.dataset, "train");
    /// ```
    pub fn from_json_line(line: &str) -> Result<Self, PreprocessingError> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Reads every line of `path` as a record, in file order.
///
/// A final newline does not start another record, but any other blank line
/// is an error.
///
/// # Errors
/// [`PreprocessingError::IoError`] if the file cannot be read,
/// [`PreprocessingError::SerializationError`] naming the first line that is
/// not a valid record.
pub fn read_metrics<P: AsRef<Path>>(path: P) -> Result<Vec<MetricsRecord>, PreprocessingError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let record = MetricsRecord::from_json_line(&line).map_err(|e| {
            PreprocessingError::SerializationError(format!("line {}: {}", index + 1, e))
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Writes records as newline-delimited JSON.
pub fn write_metrics<P: AsRef<Path>>(
    path: P,
    records: &[MetricsRecord],
) -> Result<(), PreprocessingError> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    std::fs::write(path, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(dataset: &str) -> MetricsRecord {
        MetricsRecord {
            record_type: "metrics".to_string(),
            dataset: dataset.to_string(),
            r2: 0.9,
            mse: 5.0,
            mad: 1.5,
        }
    }

    #[test]
    fn test_roundtrip_keeps_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        write_metrics(&path, &[record("train"), record("test")]).unwrap();

        let records = read_metrics(&path).unwrap();
        assert_eq!(records, vec![record("train"), record("test")]);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with(r#"{"type":"metrics","dataset":"train""#));
    }

    #[test]
    fn test_blank_line_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        std::fs::write(
            &path,
            "{\"type\":\"metrics\",\"dataset\":\"train\",\"r2\":0.9,\"mse\":5.0,\"mad\":1.5}\n\n",
        )
        .unwrap();

        let err = read_metrics(&path).unwrap_err();
        assert!(matches!(err, PreprocessingError::SerializationError(_)));
        assert!(err.to_string().contains("line 2"), "{}", err);
    }

    #[test]
    fn test_final_newline_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        let line = "{\"type\":\"metrics\",\"dataset\":\"train\",\"r2\":0.9,\"mse\":5.0,\"mad\":1.5}";

        std::fs::write(&path, line).unwrap();
        assert_eq!(read_metrics(&path).unwrap().len(), 1);

        std::fs::write(&path, format!("{}\n", line)).unwrap();
        assert_eq!(read_metrics(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_bad_line_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.json");
        std::fs::write(
            &path,
            "{\"type\":\"metrics\",\"dataset\":\"train\",\"r2\":0.9,\"mse\":5.0,\"mad\":1.5}\n{\"type\":\"metrics\"}\n",
        )
        .unwrap();

        let err = read_metrics(&path).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_metrics(dir.path().join("absent.json")),
            Err(PreprocessingError::IoError(_))
        ));
    }
}
