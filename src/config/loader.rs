//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ClusterExportConfig;
use crate::domain::errors::ClusterExportError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Prefix of environment variable overrides
pub const ENV_PREFIX: &str = "CLUSTER_EXPORT";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ClusterExportConfig
/// 4. Applies environment variable overrides (CLUSTER_EXPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use cluster_export::config::loader::load_config;
///
/// let config = load_config("cluster-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ClusterExportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ClusterExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ClusterExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses, overrides and validates configuration text
///
/// # Errors
///
/// Same as [`load_config`], minus file access.
pub fn parse_config(contents: &str) -> Result<ClusterExportConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ClusterExportConfig = toml::from_str(&contents).map_err(|e| {
        ClusterExportError::Configuration(format!("Failed to parse TOML: {}", e))
    })?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ClusterExportError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ClusterExportError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ClusterExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_override(section: &str, key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}_{section}_{key}")).ok()
}

/// Applies environment variable overrides using the CLUSTER_EXPORT_* prefix
///
/// Environment variables follow the pattern: CLUSTER_EXPORT_<SECTION>_<KEY>
/// For example: CLUSTER_EXPORT_EXPORT_DIRECTORY, CLUSTER_EXPORT_SUMMARY_UNIT_TYPE
///
/// # Errors
///
/// Returns an error if an override holds an unparseable value.
fn apply_env_overrides(config: &mut ClusterExportConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_override("APPLICATION", "LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Case overrides
    if let Some(val) = env_override("CASE", "PATH") {
        config.case.path = val;
    }

    // Export overrides
    if let Some(val) = env_override("EXPORT", "DIRECTORY") {
        config.export.directory = val;
    }
    if let Some(val) = env_override("EXPORT", "CLUSTER_RUN") {
        config.export.cluster_run = val;
    }
    if let Some(val) = env_override("EXPORT", "CLUSTERS") {
        config.export.clusters = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| {
                ClusterExportError::Configuration(format!(
                    "Invalid {ENV_PREFIX}_EXPORT_CLUSTERS: {e}"
                ))
            })?;
    }
    if let Some(val) = env_override("EXPORT", "INCLUDE_PSEUDO_CLUSTERS") {
        config.export.include_pseudo_clusters = val.parse().unwrap_or(false);
    }
    if let Some(val) = env_override("EXPORT", "MANIFEST_FILE_NAME") {
        config.export.manifest_file_name = val;
    }
    if let Some(val) = env_override("EXPORT", "ERRORS_FILE_NAME") {
        config.export.errors_file_name = val;
    }

    // Summary overrides
    if let Some(val) = env_override("SUMMARY", "UNIT_TYPE") {
        config.summary.unit_type = val;
    }
    if let Some(val) = env_override("SUMMARY", "REPORTS_DIRECTORY") {
        config.summary.reports_directory = Some(val);
    }
    if let Some(val) = env_override("SUMMARY", "OUTPUT_DIRECTORY") {
        config.summary.output_directory = Some(val);
    }
    if let Some(val) = env_override("SUMMARY", "INVALID_REPORT_POLICY") {
        config.summary.invalid_report_policy =
            val.parse().map_err(ClusterExportError::Configuration)?;
    }
    if let Some(val) = env_override("SUMMARY", "UNKNOWN_STATISTIC_POLICY") {
        config.summary.unknown_statistic_policy =
            val.parse().map_err(ClusterExportError::Configuration)?;
    }

    // Logging overrides
    if let Some(val) = env_override("LOGGING", "LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = env_override("LOGGING", "LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_override("LOGGING", "LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
