//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Cluster Export using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Cluster Export - cluster-based item export and summary report aggregation
#[derive(Parser, Debug)]
#[command(name = "cluster-export")]
#[command(version, about, long_about = None)]
#[command(author = "Cluster Export Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "cluster-export.toml",
        env = "CLUSTER_EXPORT_CONFIG"
    )]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CLUSTER_EXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the deduplicated items of the selected clusters
    Export(commands::export::ExportArgs),

    /// Aggregate per-unit summary reports into one report
    Summarize(commands::summarize::SummarizeArgs),

    /// List cluster runs, or the clusters of one run
    Clusters(commands::clusters::ClustersArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
