//! Export command implementation
//!
//! This module implements the `export` command for exporting the
//! deduplicated items of a cluster run's clusters.

use super::load_or_report;
use crate::adapters::{CaseSource, JsonCase};
use crate::core::context::RunContext;
use crate::core::export::{select_clusters, ExportEngine, ExportRequest, ExportSummary};
use crate::domain::{ClusterExportError, ClusterId};
use clap::Args;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Override export directory
    #[arg(long)]
    pub directory: Option<String>,

    /// Override cluster run to export
    #[arg(long = "run", value_name = "NAME")]
    pub cluster_run: Option<String>,

    /// Override cluster ids to export (comma-separated; `unclusterable` and `ignorable` accepted)
    #[arg(long, value_delimiter = ',')]
    pub clusters: Vec<ClusterId>,

    /// Include the pseudo-clusters when no clusters are given
    #[arg(long = "include-pseudo")]
    pub include_pseudo_clusters: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let Some(mut config) = load_or_report(config_path) else {
            return Ok(2);
        };

        // Apply CLI overrides
        if let Some(directory) = &self.directory {
            tracing::info!(directory = %directory, "Overriding export directory from CLI");
            config.export.directory = directory.clone();
        }

        if let Some(run) = &self.cluster_run {
            tracing::info!(cluster_run = %run, "Overriding cluster run from CLI");
            config.export.cluster_run = run.clone();
        }

        if !self.clusters.is_empty() {
            tracing::info!(clusters = ?self.clusters, "Overriding clusters from CLI");
            config.export.clusters = self.clusters.clone();
        }

        if self.include_pseudo_clusters {
            config.export.include_pseudo_clusters = true;
        }

        // Validate configuration
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let cluster_run = match config.export.require_cluster_run() {
            Ok(run) => run.to_string(),
            Err(e) => {
                tracing::error!(error = %e, "Configuration validation failed");
                eprintln!("Configuration validation failed: {e}");
                return Ok(2);
            }
        };

        let case: Arc<dyn CaseSource> = match JsonCase::open(&config.case.path) {
            Ok(case) => Arc::new(case),
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to open case");
                eprintln!("Failed to open case {}: {e}", config.case.path);
                return Ok(5);
            }
        };

        let clusters = match case
            .cluster_run(&cluster_run)
            .and_then(|run| {
                select_clusters(
                    &run,
                    &config.export.clusters,
                    config.export.include_pseudo_clusters,
                )
            }) {
            Ok(clusters) => clusters,
            Err(e) => {
                tracing::error!(error = %e, "Cluster selection failed");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        // Confirmation prompt (unless --yes)
        if !self.yes {
            println!("Export Configuration:");
            println!("  Case: {}", config.case.path);
            println!("  Cluster Run: {cluster_run}");
            println!(
                "  Clusters: {}",
                clusters
                    .iter()
                    .map(ClusterId::display_name)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!("  Export Directory: {}", config.export.directory);
            println!();
            print!("Proceed with export? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Export cancelled.");
                return Ok(0);
            }
        }

        let mut request = ExportRequest::new(&config.export.directory, cluster_run, clusters);
        request.manifest_file_name = config.export.manifest_file_name.clone();
        request.errors_file_name = config.export.errors_file_name.clone();

        tracing::info!("Executing export");
        println!("🚀 Starting export...");
        println!();

        let engine = ExportEngine::for_case(case);
        let ctx = RunContext::new(shutdown_signal);
        let result = tokio::task::spawn_blocking(move || engine.execute(&request, &ctx)).await?;

        let summary = match result {
            Ok(summary) => summary,
            Err(e) => {
                crate::log_error_with_context!(&e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        print_summary(&summary);

        if summary.is_aborted() {
            tracing::warn!("Export was interrupted");
            println!("⚠️  Export was interrupted; the manifest lists what was written");
            return Ok(130);
        }

        if let Some(note) = summary.failure_note() {
            println!("⚠️  {note}");
        } else {
            println!("✅ Export completed successfully");
        }
        Ok(0)
    }
}

/// Exit code for an error that aborted the export
fn exit_code_for(error: &ClusterExportError) -> i32 {
    match error {
        ClusterExportError::Configuration(_) => 2,
        _ => 5,
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Cluster Run: {}", summary.cluster_run);
    println!("  Directory: {}", summary.target_directory.display());
    println!("  Status: {}", summary.status.as_str());
    for cluster in &summary.clusters {
        println!(
            "  Cluster {}: {} items, {} after deduplicating, {} exported, {} failed",
            cluster.name, cluster.items, cluster.deduplicated, cluster.exported, cluster.failed
        );
    }
    println!("  Exported: {}", summary.exported_items);
    println!("  Failed: {}", summary.failed_items());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_rate());
    if let Some(path) = &summary.manifest_path {
        println!("  Manifest: {}", path.display());
    }
    if let Some(path) = &summary.errors_path {
        println!("  Errors: {}", path.display());
    }
    println!();
}
