//! Export functionality for screening results.
//!
//! Screens and per-company financials can be written as CSV or JSON through
//! the [`Exporter`] trait.

use crate::report::SeriesReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer produced invalid UTF-8.
    #[error("Encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "pretty-json" | "pretty_json" => Ok(Self::PrettyJson),
            other => Err(ExportError::InvalidFormat(other.to_string())),
        }
    }
}

/// Verdicts for one company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerdictExport {
    /// Company code.
    pub code: String,

    /// Number of periods on record.
    pub periods: usize,

    /// Whether any risk rule fired.
    pub risky: bool,

    /// Whether the company is missing statements.
    pub incomplete: bool,

    /// Whether the growth rules all held.
    pub growing: bool,

    /// Whether the company passed the screen.
    pub qualified: bool,
}

/// A finished screen, ready for export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenExport {
    /// Criteria the screen applied.
    pub criteria: String,

    /// When the screen ran.
    pub generated_at: DateTime<Utc>,

    /// Codes that passed, sorted.
    pub candidates: Vec<String>,

    /// Verdicts for every company evaluated, sorted by code.
    pub verdicts: Vec<VerdictExport>,
}

impl ScreenExport {
    /// Create a new screen export stamped with the current time.
    pub fn new(
        criteria: impl Into<String>,
        candidates: Vec<String>,
        verdicts: Vec<VerdictExport>,
    ) -> Self {
        Self {
            criteria: criteria.into(),
            generated_at: Utc::now(),
            candidates,
            verdicts,
        }
    }

    /// Number of companies evaluated.
    pub fn evaluated(&self) -> usize {
        self.verdicts.len()
    }

    /// Plain-text summary table.
    pub fn to_ascii_table(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\nScreen: {}\n", self.criteria));
        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<10} {:>8} {:>8} {:>11} {:>8} {:>11}\n",
            "Code", "Periods", "Risky", "Incomplete", "Growing", "Qualified"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');

        for v in &self.verdicts {
            output.push_str(&format!(
                "{:<10} {:>8} {:>8} {:>11} {:>8} {:>11}\n",
                v.code,
                v.periods,
                yes_no(v.risky),
                yes_no(v.incomplete),
                yes_no(v.growing),
                yes_no(v.qualified)
            ));
        }

        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!(
            "{} of {} companies qualified\n",
            self.candidates.len(),
            self.evaluated()
        ));
        if !self.candidates.is_empty() {
            output.push_str(&format!("Candidates: {}\n", self.candidates.join(", ")));
        }
        output
    }
}

const fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let mut file = File::create(path)?;
        self.export_to_writer(&mut file, format)
    }

    /// Export data to any writer in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    fn export_to_writer<W: Write>(
        &self,
        writer: &mut W,
        format: ExportFormat,
    ) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        writer.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for ScreenExport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut output = String::new();

                // Write header information as comments
                output.push_str(&format!("# Criteria: {}\n", self.criteria));
                output.push_str(&format!("# Generated: {}\n", self.generated_at.to_rfc3339()));
                output.push_str(&format!(
                    "# Qualified: {} of {}\n",
                    self.candidates.len(),
                    self.evaluated()
                ));

                let mut wtr = csv::Writer::from_writer(vec![]);
                for verdict in &self.verdicts {
                    wtr.serialize(verdict)?;
                }
                output.push_str(&finish(wtr)?);
                Ok(output)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for SeriesReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut output = format!("# Code: {}\n", self.code);
                let mut wtr = csv::Writer::from_writer(vec![]);
                for row in &self.rows {
                    wtr.serialize(row)?;
                }
                output.push_str(&finish(wtr)?);
                Ok(output)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> ScreenExport {
        ScreenExport::new(
            "safe-and-growing",
            vec!["100A".to_string()],
            vec![
                VerdictExport {
                    code: "100A".to_string(),
                    periods: 2,
                    risky: false,
                    incomplete: false,
                    growing: true,
                    qualified: true,
                },
                VerdictExport {
                    code: "200B".to_string(),
                    periods: 1,
                    risky: true,
                    incomplete: true,
                    growing: false,
                    qualified: false,
                },
            ],
        )
    }

    #[rstest]
    #[case("csv", ExportFormat::Csv)]
    #[case("JSON", ExportFormat::Json)]
    #[case("pretty-json", ExportFormat::PrettyJson)]
    fn test_format_from_str(#[case] input: &str, #[case] expected: ExportFormat) {
        assert_eq!(input.parse::<ExportFormat>().unwrap(), expected);
    }

    #[test]
    fn test_format_from_str_invalid() {
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(ExportError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_format_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }

    #[test]
    fn test_screen_csv() {
        let csv = sample().export_to_string(ExportFormat::Csv).unwrap();
        assert!(csv.contains("# Criteria: safe-and-growing"));
        assert!(csv.contains("# Qualified: 1 of 2"));
        assert!(csv.contains("code,periods,risky,incomplete,growing,qualified"));
        assert!(csv.contains("100A,2,false,false,true,true"));
        assert!(csv.contains("200B,1,true,true,false,false"));
    }

    #[test]
    fn test_screen_json() {
        let export = sample();
        let json = export.export_to_string(ExportFormat::Json).unwrap();
        let parsed: ScreenExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, export);
    }

    #[test]
    fn test_screen_ascii() {
        let ascii = sample().to_ascii_table();
        assert!(ascii.contains("Screen: safe-and-growing"));
        assert!(ascii.contains("1 of 2 companies qualified"));
        assert!(ascii.contains("Candidates: 100A"));
    }

    #[test]
    fn test_export_to_writer() {
        let mut buffer = Vec::new();
        sample()
            .export_to_writer(&mut buffer, ExportFormat::PrettyJson)
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("\"candidates\": [\n    \"100A\"\n  ]"));
    }

    #[test]
    fn test_empty_screen() {
        let export = ScreenExport::new("safe", Vec::new(), Vec::new());
        assert_eq!(export.evaluated(), 0);
        assert!(export.to_ascii_table().contains("0 of 0 companies qualified"));
        assert!(!export.to_ascii_table().contains("Candidates:"));
    }
}
