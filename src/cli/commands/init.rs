//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "cluster-export.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Cluster Export configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set [case] path to your case file");
                println!("  3. Set [export] directory and cluster_run");
                println!("  4. List clusters: cluster-export clusters");
                println!("  5. Validate configuration: cluster-export validate-config");
                println!("  6. Run export: cluster-export export");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Cluster Export Configuration File

[application]
log_level = "info"

[case]
path = "case.json"

[export]
directory = "/path/to/exports"
cluster_run = "Run1"
clusters = []

[summary]
unit_type = "Custodian"

[logging]
local_enabled = false
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Cluster Export Configuration File
# Exports the deduplicated items of a cluster run and aggregates
# per-unit summary reports.
#
# Values may reference environment variables as ${VAR}.
# Any scalar key can be overridden with CLUSTER_EXPORT_<SECTION>_<KEY>,
# e.g. CLUSTER_EXPORT_EXPORT_DIRECTORY=/mnt/exports

# ============================================================================
# Application Configuration
# ============================================================================
[application]
# Log level: trace | debug | info | warn | error
log_level = "info"

# ============================================================================
# Case Configuration
# ============================================================================
[case]
# JSON case file; item source paths are relative to it
path = "case.json"

# ============================================================================
# Export Configuration
# ============================================================================
[export]
# Export root; each run writes into <directory>/<cluster run>
directory = "/path/to/exports"

# Cluster run to export
cluster_run = "Run1"

# Cluster ids to export. Empty selects every real cluster.
# The pseudo-clusters are -1 (unclusterable) and -2 (ignorable).
clusters = []
# clusters = [1, 4, -1]

# Add the pseudo-clusters to the default selection
include_pseudo_clusters = false

# Report files written into the run directory
manifest_file_name = "cluster-export.csv"
errors_file_name = "cluster-export-errors.csv"

# ============================================================================
# Summary Aggregation Configuration
# ============================================================================
[summary]
# Element name of each unit in the aggregate report
unit_type = "Custodian"

# Directory holding one sub-directory per unit (defaults to export.directory)
# reports_directory = "/path/to/exports"

# Directory receiving the aggregate summary-report.xml (defaults to export.directory)
# output_directory = "/path/to/exports"

# Unreadable unit reports: skip | abort
invalid_report_policy = "skip"

# Unknown file statistics: keep | ignore | reject
unknown_statistic_policy = "keep"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON log files
local_enabled = false

# Local log directory
local_path = "logs"

# Log rotation: daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "cluster-export.toml".to_string(),
            with_examples: false,
            force: false,
        };

        assert_eq!(args.output, "cluster-export.toml");
        assert!(!args.with_examples);
        assert!(!args.force);
    }

    #[test]
    fn test_generated_configs_parse() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config = parse_config(&content).unwrap();
            assert_eq!(config.export.cluster_run, "Run1");
            assert_eq!(config.summary.unit_type, "Custodian");
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cluster-export.toml");
        fs::write(&path, "keep me").unwrap();

        let args = InitArgs {
            output: path.to_str().unwrap().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
    }
}
