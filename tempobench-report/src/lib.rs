#![warn(missing_docs)]
//! Tempobench Report - Result Export and Display
//!
//! Turns stored benchmark results into output bytes:
//! - JSON (machine-readable document with timestamp and host descriptors)
//! - CSV (fixed columns, spreadsheet-compatible, full float precision)
//! - Human-readable ranked terminal table
//!
//! Where the bytes go is the caller's business; this crate never touches
//! the filesystem.

mod csv_out;
mod human;
mod json;
mod report;

use thiserror::Error;

pub use csv_out::{generate_csv_export, CSV_HEADER};
pub use human::format_human_report;
pub use json::generate_json_export;
pub use report::{ExportDocument, HostInfo};

/// Export format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON document with timestamp and host descriptors
    Json,
    /// CSV with one header row and one row per result
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Errors that can occur while producing export bytes
#[derive(Debug, Error)]
pub enum ExportError {
    /// The requested format is not one of `json`/`csv`
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// JSON serialization failed
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    /// Writing into the output buffer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let err = "xml".parse::<ExportFormat>().unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(ref f) if f == "xml"));
    }
}
