//! Cluster export
//!
//! This module provides the Export Engine:
//! - Output naming and collision repair
//! - Manifest and errors reports
//! - Export orchestration over the selected clusters
//! - Summary and reporting

pub mod engine;
pub mod manifest;
pub mod naming;
pub mod summary;

pub use engine::{select_clusters, ExportAttempt, ExportEngine, ExportRequest};
pub use manifest::{ErrorReport, ManifestWriter};
pub use naming::{plan_targets, sanitize, ExportTarget};
pub use summary::{ClusterReport, ClusterState, ExportSummary, ItemFailure, RunStatus};
