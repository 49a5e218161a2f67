//! Row-oriented measurement table.

use crate::sampling::{Sample, SamplingRun};
use serde::Serialize;

/// Column headers, in order.
pub const HEADERS: [&str; 4] = [
    "Measurement #",
    "Temperature (°C)",
    "Elapsed Time",
    "Measured At",
];

/// One table row. Blank cells are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub sequence: Option<u32>,
    pub value: f64,
    pub elapsed: Option<String>,
    pub measured_at: Option<String>,
}

impl From<&Sample> for ReportRow {
    fn from(sample: &Sample) -> Self {
        Self {
            sequence: Some(sample.sequence),
            value: sample.value,
            elapsed: Some(sample.elapsed_hms()),
            measured_at: Some(sample.captured_hms()),
        }
    }
}

impl ReportRow {
    /// Summary row carrying only the average.
    pub fn summary(average: f64) -> Self {
        Self {
            sequence: None,
            value: average,
            elapsed: None,
            measured_at: None,
        }
    }

    pub fn is_summary(&self) -> bool {
        self.sequence.is_none()
    }

    /// Cells as text, blanks as empty strings.
    pub fn cells(&self) -> [String; 4] {
        [
            self.sequence.map(|s| s.to_string()).unwrap_or_default(),
            self.value.to_string(),
            self.elapsed.clone().unwrap_or_default(),
            self.measured_at.clone().unwrap_or_default(),
        ]
    }
}

/// Export table for a completed run: one row per sample plus a summary row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    /// Build the table from samples and their average.
    pub fn from_samples(samples: &[Sample], average: f64) -> Self {
        let mut rows: Vec<ReportRow> = samples.iter().map(ReportRow::from).collect();
        rows.push(ReportRow::summary(average));
        Self { rows }
    }

    /// Build the table for a run, `None` when the run has no valid samples.
    pub fn from_run(run: &SamplingRun) -> Option<Self> {
        run.average()
            .map(|average| Self::from_samples(run.samples(), average))
    }

    /// All rows, summary last.
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Rows for individual samples.
    pub fn sample_rows(&self) -> &[ReportRow] {
        &self.rows[..self.rows.len() - 1]
    }

    pub fn summary(&self) -> &ReportRow {
        &self.rows[self.rows.len() - 1]
    }

    pub fn average(&self) -> f64 {
        self.summary().value
    }
}
