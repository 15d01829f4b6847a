//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting the result of
//! one cluster export run.

use crate::domain::{ClusterId, ItemGuid};
use std::path::PathBuf;
use std::time::Duration;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every selected cluster was processed; per-item failures may exist
    Completed,
    /// Cancellation was requested and the run stopped early
    Aborted,
}

impl RunStatus {
    /// Final status line shown to the user
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Completed => "Completed",
            RunStatus::Aborted => "Aborted",
        }
    }
}

/// Processing state of one cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterState {
    /// Creating the output directory
    Preparing,
    /// Loading and deduplicating items
    Deduplicating,
    /// Computing file names and repairing collisions
    NamingAndCollisionResolution,
    /// Writing items
    Exporting,
    /// All items attempted
    Done,
    /// Stopped by cancellation
    Aborted,
}

/// Result for one cluster
#[derive(Debug, Clone)]
pub struct ClusterReport {
    /// Cluster id
    pub id: ClusterId,

    /// Directory name of the cluster
    pub name: String,

    /// Final state
    pub state: ClusterState,

    /// Items in the cluster before deduplication
    pub items: usize,

    /// Items left after deduplication
    pub deduplicated: usize,

    /// Items exported
    pub exported: usize,

    /// Items whose export failed
    pub failed: usize,
}

impl ClusterReport {
    /// Creates a report for a cluster that is being prepared
    pub fn new(id: ClusterId) -> Self {
        Self {
            id,
            name: id.display_name(),
            state: ClusterState::Preparing,
            items: 0,
            deduplicated: 0,
            exported: 0,
            failed: 0,
        }
    }

    /// Moves the cluster to another state
    pub fn enter(&mut self, state: ClusterState) {
        tracing::debug!(cluster = %self.name, from = ?self.state, to = ?state, "Cluster state");
        self.state = state;
    }
}

/// A per-item export failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// Item that failed
    pub guid: ItemGuid,

    /// Composite cluster key the item was exported under
    pub cluster_key: String,

    /// Failure message from the exporter
    pub message: String,
}

/// Summary of an export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Cluster run name as stored in the case
    pub cluster_run: String,

    /// Root directory of this run's output
    pub target_directory: PathBuf,

    /// How the run ended
    pub status: RunStatus,

    /// Per-cluster results, in processing order
    pub clusters: Vec<ClusterReport>,

    /// Number of items exported
    pub exported_items: usize,

    /// Per-item failures, in attempt order
    pub failures: Vec<ItemFailure>,

    /// Manifest written by the run
    pub manifest_path: Option<PathBuf>,

    /// Errors report, present only if an item failed
    pub errors_path: Option<PathBuf>,

    /// Duration of the run
    pub duration: Duration,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(cluster_run: impl Into<String>, target_directory: impl Into<PathBuf>) -> Self {
        Self {
            cluster_run: cluster_run.into(),
            target_directory: target_directory.into(),
            status: RunStatus::Completed,
            clusters: Vec::new(),
            exported_items: 0,
            failures: Vec::new(),
            manifest_path: None,
            errors_path: None,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a successful export
    pub fn record_export(&mut self) {
        self.exported_items += 1;
    }

    /// Record a failed export
    pub fn record_failure(&mut self, failure: ItemFailure) {
        self.failures.push(failure);
    }

    /// Number of failed items
    pub fn failed_items(&self) -> usize {
        self.failures.len()
    }

    /// Number of export attempts (manifest rows)
    pub fn attempted_items(&self) -> usize {
        self.exported_items + self.failures.len()
    }

    /// True if cancellation stopped the run
    pub fn is_aborted(&self) -> bool {
        self.status == RunStatus::Aborted
    }

    /// True if any item failed
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.attempted_items() == 0 {
            return 100.0;
        }
        (self.exported_items as f64 / self.attempted_items() as f64) * 100.0
    }

    /// Note shown when a completed run had failures
    pub fn failure_note(&self) -> Option<String> {
        if !self.has_failures() {
            return None;
        }
        let report = self
            .errors_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "the errors report".to_string());
        Some(format!(
            "{} item(s) failed to export, see {}",
            self.failed_items(),
            report
        ))
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            cluster_run = %self.cluster_run,
            target_directory = %self.target_directory.display(),
            status = self.status.as_str(),
            clusters = self.clusters.len(),
            exported = self.exported_items,
            failed = self.failed_items(),
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Cluster export finished"
        );

        if let Some(note) = self.failure_note() {
            tracing::warn!("{note}");
        }
    }
}
