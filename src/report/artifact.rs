//! Output formats, naming and delivery options for generated reports

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Fixed stem of every report file name
pub const ARTIFACT_STEM: &str = "10-Year-Investment-Analysis";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ReportFormat::Html => "text/html; charset=utf-8",
            ReportFormat::Csv => "text/csv; charset=utf-8",
            ReportFormat::Json => "application/json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(ReportFormat::Html),
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{}'", other)),
        }
    }
}

/// Where the finished artifact goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Write the file into `dir`
    Save { dir: PathBuf },
    /// Hand the bytes back to the caller
    InMemory,
}

impl Default for OutputMode {
    fn default() -> Self {
        OutputMode::Save {
            dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOptions {
    pub format: ReportFormat,
    pub output: OutputMode,
    /// Drives the file name, fiscal-year line and year headers; today when unset
    pub report_date: Option<NaiveDate>,
}

/// A rendered report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifact {
    pub file_name: String,
    pub format: ReportFormat,
    pub bytes: Vec<u8>,
    /// Set when the artifact was written to disk
    pub saved_to: Option<PathBuf>,
}

/// `10-Year-Investment-Analysis-<YYYY-MM-DD>.<ext>`
pub fn artifact_file_name(format: ReportFormat, date: NaiveDate) -> String {
    format!(
        "{}-{}.{}",
        ARTIFACT_STEM,
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(
            artifact_file_name(ReportFormat::Html, date),
            "10-Year-Investment-Analysis-2026-03-07.html"
        );
        assert_eq!(
            artifact_file_name(ReportFormat::Csv, date),
            "10-Year-Investment-Analysis-2026-03-07.csv"
        );
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("HTML".parse::<ReportFormat>(), Ok(ReportFormat::Html));
        assert_eq!(" json ".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert!("pdf".parse::<ReportFormat>().is_err());
    }
}
