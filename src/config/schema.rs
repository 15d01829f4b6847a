//! Configuration schema types
//!
//! This module defines the configuration structure for cluster exports and
//! summary aggregation.

use crate::core::export::manifest::{DEFAULT_ERRORS_FILE_NAME, DEFAULT_MANIFEST_FILE_NAME};
use crate::domain::ClusterId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// What to do with a unit report that cannot be parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InvalidReportPolicy {
    /// Log a warning, leave the unit out, and continue
    #[default]
    Skip,
    /// Stop aggregation with the parse error
    Abort,
}

impl FromStr for InvalidReportPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            _ => Err(format!(
                "Invalid report policy '{s}'. Must be one of: skip, abort"
            )),
        }
    }
}

impl fmt::Display for InvalidReportPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::Abort => write!(f, "abort"),
        }
    }
}

/// What to do with a file statistic outside the known set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownStatisticPolicy {
    /// Aggregate it like a known counter
    #[default]
    Keep,
    /// Drop it with a debug log
    Ignore,
    /// Treat the report as invalid
    Reject,
}

impl FromStr for UnknownStatisticPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            _ => Err(format!(
                "Invalid statistic policy '{s}'. Must be one of: keep, ignore, reject"
            )),
        }
    }
}

impl fmt::Display for UnknownStatisticPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::Ignore => write!(f, "ignore"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Main configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterExportConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Case to export from
    #[serde(default)]
    pub case: CaseConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Summary aggregation settings
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClusterExportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.case.validate()?;
        self.export.validate()?;
        self.summary.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Case configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseConfig {
    /// Path of the JSON case file
    #[serde(default = "default_case_path")]
    pub path: String,
}

impl Default for CaseConfig {
    fn default() -> Self {
        Self {
            path: default_case_path(),
        }
    }
}

impl CaseConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("case.path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Export root; each run writes into `<directory>/<cluster run>`
    #[serde(default)]
    pub directory: String,

    /// Cluster run to export
    #[serde(default)]
    pub cluster_run: String,

    /// Cluster ids to export; empty selects every real cluster
    #[serde(default)]
    pub clusters: Vec<ClusterId>,

    /// Also select the unclusterable and ignorable pseudo-clusters by default
    #[serde(default)]
    pub include_pseudo_clusters: bool,

    /// Manifest file name
    #[serde(default = "default_manifest_file_name")]
    pub manifest_file_name: String,

    /// Errors report file name
    #[serde(default = "default_errors_file_name")]
    pub errors_file_name: String,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.directory.trim().is_empty() {
            return Err("Please select export directory".to_string());
        }

        validate_file_name("export.manifest_file_name", &self.manifest_file_name)?;
        validate_file_name("export.errors_file_name", &self.errors_file_name)?;

        if self.manifest_file_name == self.errors_file_name {
            return Err(
                "export.manifest_file_name and export.errors_file_name must differ".to_string(),
            );
        }

        Ok(())
    }

    /// The cluster run to export
    ///
    /// # Errors
    ///
    /// Returns an error if no cluster run is configured.
    pub fn require_cluster_run(&self) -> Result<&str, String> {
        if self.cluster_run.trim().is_empty() {
            return Err("Please select a cluster run".to_string());
        }
        Ok(&self.cluster_run)
    }
}

/// Summary aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Name of a unit, used for the `<UnitType>Details` element
    #[serde(default = "default_unit_type")]
    pub unit_type: String,

    /// Directory holding one sub-directory per unit (default: output directory)
    #[serde(default)]
    pub reports_directory: Option<String>,

    /// Where the aggregate report is written (default: export directory)
    #[serde(default)]
    pub output_directory: Option<String>,

    /// Handling of unparseable unit reports
    #[serde(default)]
    pub invalid_report_policy: InvalidReportPolicy,

    /// Handling of file statistics outside the known set
    #[serde(default)]
    pub unknown_statistic_policy: UnknownStatisticPolicy,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            unit_type: default_unit_type(),
            reports_directory: None,
            output_directory: None,
            invalid_report_policy: InvalidReportPolicy::default(),
            unknown_statistic_policy: UnknownStatisticPolicy::default(),
        }
    }
}

impl SummaryConfig {
    fn validate(&self) -> Result<(), String> {
        let mut chars = self.unit_type.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            }
            None => false,
        };
        if !valid {
            return Err(format!(
                "summary.unit_type '{}' must be a plain XML element name",
                self.unit_type
            ));
        }
        Ok(())
    }

    /// Directory the aggregate report is written to
    pub fn output_directory(&self, export: &ExportConfig) -> PathBuf {
        match &self.output_directory {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => PathBuf::from(&export.directory),
        }
    }

    /// Directory searched for unit reports
    pub fn reports_directory(&self, export: &ExportConfig) -> PathBuf {
        match &self.reports_directory {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => self.output_directory(export),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        Ok(())
    }
}

fn validate_file_name(key: &str, name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{key} cannot be empty"));
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(format!("{key} '{name}' must be a plain file name"));
    }
    Ok(())
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_case_path() -> String {
    "case.json".to_string()
}

fn default_manifest_file_name() -> String {
    DEFAULT_MANIFEST_FILE_NAME.to_string()
}

fn default_errors_file_name() -> String {
    DEFAULT_ERRORS_FILE_NAME.to_string()
}

fn default_unit_type() -> String {
    "Custodian".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export_config() -> ExportConfig {
        ExportConfig {
            directory: "/exports".to_string(),
            cluster_run: "Run1".to_string(),
            clusters: vec![],
            include_pseudo_clusters: false,
            manifest_file_name: default_manifest_file_name(),
            errors_file_name: default_errors_file_name(),
        }
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_export_directory_required() {
        let mut config = export_config();
        assert!(config.validate().is_ok());

        config.directory = "  ".to_string();
        assert_eq!(
            config.validate().unwrap_err(),
            "Please select export directory"
        );
    }

    #[test]
    fn test_export_file_names() {
        let mut config = export_config();
        config.manifest_file_name = "../manifest.csv".to_string();
        assert!(config.validate().is_err());

        let mut config = export_config();
        config.errors_file_name = config.manifest_file_name.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_require_cluster_run() {
        let mut config = export_config();
        assert_eq!(config.require_cluster_run().unwrap(), "Run1");

        config.cluster_run = String::new();
        assert_eq!(
            config.require_cluster_run().unwrap_err(),
            "Please select a cluster run"
        );
    }

    #[test]
    fn test_summary_directories_default_to_export() {
        let export = export_config();
        let mut summary = SummaryConfig::default();

        assert_eq!(summary.output_directory(&export), PathBuf::from("/exports"));
        assert_eq!(summary.reports_directory(&export), PathBuf::from("/exports"));

        summary.output_directory = Some("/summary".to_string());
        assert_eq!(summary.reports_directory(&export), PathBuf::from("/summary"));

        summary.reports_directory = Some("/reports".to_string());
        assert_eq!(summary.reports_directory(&export), PathBuf::from("/reports"));
        assert_eq!(summary.output_directory(&export), PathBuf::from("/summary"));
    }

    #[test]
    fn test_unit_type_validation() {
        let mut summary = SummaryConfig::default();
        assert!(summary.validate().is_ok());

        summary.unit_type = "Custodian Name".to_string();
        assert!(summary.validate().is_err());

        summary.unit_type = String::new();
        assert!(summary.validate().is_err());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "ABORT".parse::<InvalidReportPolicy>().unwrap(),
            InvalidReportPolicy::Abort
        );
        assert_eq!(
            "ignore".parse::<UnknownStatisticPolicy>().unwrap(),
            UnknownStatisticPolicy::Ignore
        );
        assert!("sometimes".parse::<UnknownStatisticPolicy>().is_err());
        assert_eq!(InvalidReportPolicy::Skip.to_string(), "skip");
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ClusterExportConfig = toml::from_str(
            r#"
[export]
directory = "/exports"
cluster_run = "Run1"
clusters = [3, -1]
"#,
        )
        .unwrap();

        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.case.path, "case.json");
        assert_eq!(
            config.export.clusters,
            vec![ClusterId::new(3), ClusterId::UNCLUSTERABLE]
        );
        assert_eq!(config.export.manifest_file_name, "cluster-export.csv");
        assert_eq!(config.summary.unit_type, "Custodian");
        assert_eq!(config.summary.invalid_report_policy, InvalidReportPolicy::Skip);
        assert!(!config.logging.local_enabled);
        assert!(config.validate().is_ok());
    }
}
