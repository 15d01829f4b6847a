//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod clusters;
pub mod export;
pub mod init;
pub mod summarize;
pub mod validate;

use crate::config::{load_config, ClusterExportConfig};

/// Loads the configuration, printing the error on failure
///
/// `None` means the command should exit with the configuration error code.
pub(crate) fn load_or_report(config_path: &str) -> Option<ClusterExportConfig> {
    match load_config(config_path) {
        Ok(config) => Some(config),
        Err(e) => {
            crate::log_error_with_context!(&e, "Failed to load configuration");
            eprintln!("Failed to load configuration: {e}");
            None
        }
    }
}
