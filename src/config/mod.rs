//! Configuration management.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Configuration files support:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CLUSTER_EXPORT_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use cluster_export::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("cluster-export.toml")?;
//!
//! println!("Case: {}", config.case.path);
//! println!("Export directory: {}", config.export.directory);
//! println!("Cluster run: {}", config.export.cluster_run);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`CaseConfig`] - Case file location
//! - [`ExportConfig`] - Export directory, cluster run and selection, report names
//! - [`SummaryConfig`] - Summary aggregation inputs and policies
//! - [`LoggingConfig`] - Local JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [case]
//! path = "case.json"
//!
//! [export]
//! directory = "${EXPORT_ROOT}"
//! cluster_run = "Run1"
//! clusters = []
//!
//! [summary]
//! unit_type = "Custodian"
//! invalid_report_policy = "skip"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, CaseConfig, ClusterExportConfig, ExportConfig, InvalidReportPolicy,
    LoggingConfig, SummaryConfig, UnknownStatisticPolicy,
};
