//! Domain error types
//!
//! This module defines the error hierarchy for cluster exports and report
//! aggregation. Errors are domain-specific and don't expose third-party types.
//!
//! Per-item export failures are deliberately absent here: they are recovered
//! inside the export engine and surface as
//! [`ExportAttempt::Failed`](crate::core::export::ExportAttempt) values.

use thiserror::Error;

/// Main error type
///
/// This is the primary error type used throughout the library.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ClusterExportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Directory creation or other filesystem failures that abort a run
    #[error("Filesystem error: {0}")]
    Filesystem(String),

    /// Case data could not be loaded or queried
    #[error("Case error: {0}")]
    Case(String),

    /// Summary report errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Summary report errors
///
/// Errors raised while reading per-unit `summary-report.xml` files or
/// writing the aggregate report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to read a report file
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    /// The file is not well-formed XML
    #[error("Malformed XML in {path}: {message}")]
    Parse { path: String, message: String },

    /// A required element or attribute is missing
    #[error("Missing {element} in {path}")]
    MissingElement { path: String, element: String },

    /// A counter did not hold an integer
    #[error("Invalid number '{value}' for {field} in {path}")]
    InvalidNumber {
        path: String,
        field: String,
        value: String,
    },

    /// A file statistic outside the declared set, under the reject policy
    #[error("Unknown file statistic {field} in {path}")]
    UnknownStatistic { path: String, field: String },

    /// No usable unit reports were found
    #[error("No summary reports found under {0}")]
    NoReports(String),

    /// Failed to write the aggregate report
    #[error("Failed to write summary report: {0}")]
    Write(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for ClusterExportError {
    fn from(err: std::io::Error) -> Self {
        ClusterExportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ClusterExportError {
    fn from(err: serde_json::Error) -> Self {
        ClusterExportError::Serialization(err.to_string())
    }
}

// Conversion from csv::Error
impl From<csv::Error> for ClusterExportError {
    fn from(err: csv::Error) -> Self {
        ClusterExportError::Io(format!("CSV write failed: {err}"))
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ClusterExportError {
    fn from(err: toml::de::Error) -> Self {
        ClusterExportError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClusterExportError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_report_error_conversion() {
        let report_err = ReportError::NoReports("/exports".to_string());
        let err: ClusterExportError = report_err.into();
        assert!(matches!(err, ClusterExportError::Report(_)));
        assert_eq!(
            err.to_string(),
            "Report error: No summary reports found under /exports"
        );
    }

    #[test]
    fn test_missing_element_display() {
        let err = ReportError::MissingElement {
            path: "a/summary-report.xml".to_string(),
            element: "Export".to_string(),
        };
        assert_eq!(err.to_string(), "Missing Export in a/summary-report.xml");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: ClusterExportError = io_err.into();
        assert!(matches!(err, ClusterExportError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ClusterExportError = json_err.into();
        assert!(matches!(err, ClusterExportError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: ClusterExportError = toml_err.into();
        assert!(matches!(err, ClusterExportError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_implements_std_error() {
        let err = ClusterExportError::Filesystem("Permission denied".to_string());
        let _: &dyn std::error::Error = &err;
        let err = ReportError::Write("disk full".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
