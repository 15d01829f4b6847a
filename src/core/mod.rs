//! Core business logic.
//!
//! # Modules
//!
//! - [`context`] - Run context: cancellation flag and progress reporting
//! - [`export`] - Export Engine: naming, collision repair, manifest, orchestration
//! - [`report`] - Report Aggregator: unit report parsing, folding, aggregate XML
//!
//! The two subsystems never call each other. A pipeline runs the export
//! once per case; aggregation runs once the unit reports exist.
//!
//! # Example
//!
//! ```rust,no_run
//! use cluster_export::adapters::JsonCase;
//! use cluster_export::core::context::RunContext;
//! use cluster_export::core::export::{select_clusters, ExportEngine, ExportRequest};
//! use cluster_export::adapters::CaseSource;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let case = Arc::new(JsonCase::open("case.json")?);
//! let run = case.cluster_run("Run1")?;
//! let clusters = select_clusters(&run, &[], false)?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let engine = ExportEngine::for_case(case);
//! let request = ExportRequest::new("/exports", "Run1", clusters);
//! let summary = engine.execute(&request, &RunContext::new(shutdown_rx))?;
//!
//! println!("Exported: {}", summary.exported_items);
//! println!("Failed: {}", summary.failed_items());
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod export;
pub mod report;
