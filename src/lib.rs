// Cluster Export - cluster-based item export and summary report aggregation
// Copyright (c) 2025 Cluster Export Contributors
// Licensed under the MIT License

//! # Cluster Export
//!
//! Cluster Export takes the clusters produced by a clustering run over a case
//! and exports each cluster's deduplicated items to disk, one folder per
//! cluster, with a CSV manifest of everything that was written.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Exporting** the deduplicated items of selected clusters, with
//!   collision-free file names and a manifest/errors CSV pair
//! - **Aggregating** the per-unit `summary-report.xml` files of a multi-unit
//!   export into one report
//!
//! ## Architecture
//!
//! Cluster Export follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (export engine, report aggregator, run context)
//! - [`adapters`] - Collaborators (case source, deduplication, binary export, filesystem)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cluster_export::adapters::{CaseSource, JsonCase};
//! use cluster_export::config::load_config;
//! use cluster_export::core::context::RunContext;
//! use cluster_export::core::export::{select_clusters, ExportEngine, ExportRequest};
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("cluster-export.toml")?;
//!
//!     let case = Arc::new(JsonCase::open(&config.case.path)?);
//!     let run = case.cluster_run(&config.export.cluster_run)?;
//!     let clusters = select_clusters(&run, &config.export.clusters, false)?;
//!
//!     let engine = ExportEngine::for_case(case);
//!     let request = ExportRequest::new(&config.export.directory, run.name, clusters);
//!     let summary = engine.execute(&request, &RunContext::detached())?;
//!
//!     println!("Exported {} items", summary.exported_items);
//!     Ok(())
//! }
//! ```
//!
//! ## Summary Reports
//!
//! ```rust,no_run
//! use cluster_export::core::context::RunContext;
//! use cluster_export::core::report::{aggregate_reports, SummaryRequest};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let request = SummaryRequest::new("/exports", "/exports");
//! let outcome = aggregate_reports(&request, &RunContext::detached())?;
//! println!("Folded {} units", outcome.units.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Errors are [`domain::ClusterExportError`] values. A single item that fails
//! to export is not an error: it becomes an `ERROR` row in the manifest and a
//! row in the errors report, and the run carries on.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
