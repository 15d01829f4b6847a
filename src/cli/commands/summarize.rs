//! Summarize command implementation
//!
//! This module implements the `summarize` command, which merges the
//! per-unit `summary-report.xml` files into one aggregate report.

use super::load_or_report;
use crate::config::InvalidReportPolicy;
use crate::core::context::RunContext;
use crate::core::export::RunStatus;
use crate::core::report::{aggregate_reports, SummaryRequest};
use crate::domain::ClusterExportError;
use chrono::Local;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the summarize command
#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Override directory holding one sub-directory per unit
    #[arg(long)]
    pub reports_directory: Option<String>,

    /// Override directory receiving the aggregate report
    #[arg(long)]
    pub output_directory: Option<String>,

    /// Override unit type (e.g. Custodian)
    #[arg(long)]
    pub unit_type: Option<String>,

    /// Override handling of unreadable unit reports (skip or abort)
    #[arg(long)]
    pub invalid_report_policy: Option<InvalidReportPolicy>,
}

impl SummarizeArgs {
    /// Execute the summarize command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let start_time = Local::now();
        tracing::info!("Starting summarize command");

        let Some(mut config) = load_or_report(config_path) else {
            return Ok(2);
        };

        if let Some(dir) = &self.reports_directory {
            config.summary.reports_directory = Some(dir.clone());
        }
        if let Some(dir) = &self.output_directory {
            config.summary.output_directory = Some(dir.clone());
        }
        if let Some(unit_type) = &self.unit_type {
            config.summary.unit_type = unit_type.clone();
        }
        if let Some(policy) = self.invalid_report_policy {
            config.summary.invalid_report_policy = policy;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let request = SummaryRequest::from_config(&config, start_time);
        println!(
            "📝 Summarizing reports in {}",
            request.reports_directory.display()
        );

        let ctx = RunContext::new(shutdown_signal);
        let result = tokio::task::spawn_blocking(move || aggregate_reports(&request, &ctx)).await?;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                crate::log_error_with_context!(&e, "Summary aggregation failed");
                eprintln!("Summary aggregation failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        if outcome.status == RunStatus::Aborted {
            println!("⚠️  Summary aggregation was interrupted; no report written");
            return Ok(130);
        }

        println!();
        println!("📊 Summary Report:");
        println!("  Units: {}", outcome.units.len());
        println!("  Skipped: {}", outcome.skipped.len());
        for skipped in &outcome.skipped {
            println!("    - {} ({})", skipped.path.display(), skipped.reason);
        }
        if let Some(path) = &outcome.report_path {
            println!("  Report: {}", path.display());
        }
        println!();
        Ok(0)
    }
}

/// Exit code for an error that stopped the aggregation
fn exit_code_for(error: &ClusterExportError) -> i32 {
    match error {
        ClusterExportError::Configuration(_) => 2,
        _ => 5,
    }
}
