//! Spreadsheet serialisation of reports.

use crate::error::{Result, SensorError};
use crate::report::table::{Report, HEADERS};
use rust_xlsxwriter::{Format, Workbook};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// File stem for exported reports.
pub const REPORT_FILE_STEM: &str = "temperature_measurements";

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Csv => "csv",
        }
    }

    /// Default file name for this format.
    pub fn file_name(&self) -> String {
        format!("{}.{}", REPORT_FILE_STEM, self.extension())
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = SensorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ReportFormat::Xlsx),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(SensorError::config_error(format!(
                "Unsupported report format: {}. Use 'xlsx' or 'csv'",
                other
            ))),
        }
    }
}

impl Report {
    /// Serialise into the given format.
    pub fn to_bytes(&self, format: ReportFormat) -> Result<Vec<u8>> {
        match format {
            ReportFormat::Xlsx => self.to_xlsx(),
            ReportFormat::Csv => self.to_csv(),
        }
    }

    /// Single-sheet workbook with a bold header row. Blank cells are left unwritten.
    pub fn to_xlsx(&self) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();

        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Measurements")?;

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
            worksheet.set_column_width(col as u16, 18)?;
        }

        for (index, row) in self.rows().iter().enumerate() {
            let r = index as u32 + 1;
            if let Some(sequence) = row.sequence {
                worksheet.write_number(r, 0, sequence)?;
            }
            worksheet.write_number(r, 1, row.value)?;
            if let Some(elapsed) = &row.elapsed {
                worksheet.write_string(r, 2, elapsed)?;
            }
            if let Some(measured_at) = &row.measured_at {
                worksheet.write_string(r, 3, measured_at)?;
            }
        }

        Ok(workbook.save_to_buffer()?)
    }

    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADERS)?;
        for row in self.rows() {
            writer.write_record(row.cells())?;
        }
        writer
            .into_inner()
            .map_err(|e| SensorError::report_error(e.to_string()))
    }

    /// Write to `path`, replacing any previous file.
    pub fn write_to(&self, path: &Path, format: ReportFormat) -> Result<()> {
        let bytes = self.to_bytes(format)?;
        std::fs::write(path, bytes)?;
        info!("Report written to {}", path.display());
        Ok(())
    }

    /// Write the default-named file into `dir` and return its path.
    pub fn write_to_dir(&self, dir: &Path, format: ReportFormat) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format.file_name());
        self.write_to(&path, format)?;
        Ok(path)
    }
}
