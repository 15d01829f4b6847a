//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Cluster Export configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading validates as well
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Case: {}", config.case.path);
        println!("  Export Directory: {}", config.export.directory);
        match config.export.require_cluster_run() {
            Ok(run) => println!("  Cluster Run: {run}"),
            Err(_) => println!("  Cluster Run: (not set, required for export)"),
        }
        if config.export.clusters.is_empty() {
            println!(
                "  Clusters: All{}",
                if config.export.include_pseudo_clusters {
                    " (including pseudo-clusters)"
                } else {
                    ""
                }
            );
        } else {
            let ids: Vec<String> = config
                .export
                .clusters
                .iter()
                .map(|c| c.display_name())
                .collect();
            println!("  Clusters: {}", ids.join(", "));
        }
        println!("  Manifest: {}", config.export.manifest_file_name);
        println!("  Errors Report: {}", config.export.errors_file_name);
        println!("  Unit Type: {}", config.summary.unit_type);
        println!(
            "  Reports Directory: {}",
            config.summary.reports_directory(&config.export).display()
        );
        println!(
            "  Summary Output: {}",
            config.summary.output_directory(&config.export).display()
        );
        println!(
            "  Invalid Report Policy: {}",
            config.summary.invalid_report_policy
        );
        println!(
            "  Unknown Statistic Policy: {}",
            config.summary.unknown_statistic_policy
        );
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_validate_missing_export_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cluster-export.toml");
        std::fs::write(&path, "[export]\ncluster_run = \"Run1\"\n").unwrap();

        let code = ValidateArgs {}
            .execute(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_validate_valid_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cluster-export.toml");
        std::fs::write(&path, "[export]\ndirectory = \"/exports\"\n").unwrap();

        let code = ValidateArgs {}
            .execute(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }
}
