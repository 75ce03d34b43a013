//! CSV sink for evaluation results.
//!
//! Rows are flushed as soon as they are written so an interrupted run keeps
//! everything recorded up to that point.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// One row of the results file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalRecord {
    pub prompt_id: String,
    pub image_file: String,
    pub model: String,
    pub predicted_label: String,
    /// Wall-clock call latency, `-1` if the call never started
    pub latency_ms: i64,
    pub cost_usd: f64,
}

/// Name of the results file for a model and run start time.
pub fn results_file_name(model: &str, started_at: DateTime<Local>) -> String {
    format!(
        "evaluation_results_{}_{}.csv",
        model.replace('/', "_"),
        started_at.format("%Y%m%d_%H%M%S")
    )
}

/// Writes [`EvalRecord`]s as CSV with a fixed header.
pub struct ResultsWriter<W: Write> {
    writer: csv::Writer<W>,
    rows_written: usize,
}

impl ResultsWriter<File> {
    /// Create the results file in `dir`, named after the model and start time.
    pub fn create_in(
        dir: &Path,
        model: &str,
        started_at: DateTime<Local>,
    ) -> Result<(Self, PathBuf)> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(results_file_name(model, started_at));
        let file = File::create(&path)?;
        Ok((Self::new(file)?, path))
    }
}

impl<W: Write> ResultsWriter<W> {
    /// Wrap a writer and emit the header row immediately.
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(inner);
        writer.write_record([
            "prompt_id",
            "image_file",
            "model",
            "predicted_label",
            "latency_ms",
            "cost_usd",
        ])?;
        writer.flush()?;
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Append one row and flush it.
    pub fn write(&mut self, record: &EvalRecord) -> Result<()> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }

    /// Number of data rows written.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(label: &str) -> EvalRecord {
        EvalRecord {
            prompt_id: "simple".to_string(),
            image_file: "fox.jpg".to_string(),
            model: "gemini/gemini-2.0-flash".to_string(),
            predicted_label: label.to_string(),
            latency_ms: 812,
            cost_usd: 0.000131,
        }
    }

    #[test]
    fn test_header_and_rows() {
        let mut writer = ResultsWriter::new(Vec::new()).unwrap();
        writer.write(&record("Red fox")).unwrap();
        writer.write(&record("Label, with \"quotes\"")).unwrap();
        assert_eq!(writer.rows_written(), 2);

        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "prompt_id,image_file,model,predicted_label,latency_ms,cost_usd"
        );
        assert_eq!(
            lines[1],
            "simple,fox.jpg,gemini/gemini-2.0-flash,Red fox,812,0.000131"
        );
        assert!(lines[2].contains("\"Label, with \"\"quotes\"\"\""));
    }

    #[test]
    fn test_header_written_before_rows() {
        let writer = ResultsWriter::new(Vec::new()).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(
            output,
            "prompt_id,image_file,model,predicted_label,latency_ms,cost_usd\n"
        );
    }

    #[test]
    fn test_results_file_name() {
        let started = Local.with_ymd_and_hms(2025, 4, 12, 9, 5, 3).unwrap();
        assert_eq!(
            results_file_name("gemini/gemini-2.0-flash", started),
            "evaluation_results_gemini_gemini-2.0-flash_20250412_090503.csv"
        );
    }

    #[test]
    fn test_create_in_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let started = Local.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let (mut writer, path) =
            ResultsWriter::create_in(&dir.path().join("runs"), "openai/gpt-4o", started).unwrap();
        writer.write(&record("x")).unwrap();
        drop(writer);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(path.ends_with("evaluation_results_openai_gpt-4o_20250101_000000.csv"));
    }
}
