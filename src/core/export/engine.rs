//! Export engine - exports the selected clusters of one cluster run
//!
//! Clusters are processed sequentially, and the items of a cluster one at a
//! time, so manifest row order and collision naming are deterministic. The
//! engine checks the run context for cancellation after every item and after
//! every cluster.

use crate::adapters::{
    BinaryExporter, CaseSource, Deduplicator, DirectoryCreator, FileCopyExporter, FsDirectories,
    Md5Deduplicator,
};
use crate::core::context::RunContext;
use crate::core::export::manifest::{
    ErrorReport, ManifestWriter, DEFAULT_ERRORS_FILE_NAME, DEFAULT_MANIFEST_FILE_NAME,
};
use crate::core::export::naming::{plan_targets, ExportTarget};
use crate::core::export::summary::{
    ClusterReport, ClusterState, ExportSummary, ItemFailure, RunStatus,
};
use crate::domain::{cluster_key, Cluster, ClusterExportError, ClusterId, ClusterRun, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Outcome of exporting a single item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportAttempt {
    /// Written to this path
    Exported(PathBuf),
    /// The exporter refused; the message goes to the errors report
    Failed(String),
}

/// What to export and where
#[derive(Debug, Clone)]
pub struct ExportRequest {
    /// Export root chosen by the user
    pub directory: PathBuf,

    /// Cluster run name, exactly as stored in the case
    pub cluster_run: String,

    /// Clusters to export, in processing order
    pub clusters: Vec<ClusterId>,

    /// Manifest file name, created in the target directory
    pub manifest_file_name: String,

    /// Errors report file name, created in the target directory
    pub errors_file_name: String,
}

impl ExportRequest {
    /// Creates a request with the default report file names
    pub fn new(
        directory: impl Into<PathBuf>,
        cluster_run: impl Into<String>,
        clusters: Vec<ClusterId>,
    ) -> Self {
        Self {
            directory: directory.into(),
            cluster_run: cluster_run.into(),
            clusters,
            manifest_file_name: DEFAULT_MANIFEST_FILE_NAME.to_string(),
            errors_file_name: DEFAULT_ERRORS_FILE_NAME.to_string(),
        }
    }

    /// Root of this run's output: the export directory plus the trimmed run name
    pub fn target_directory(&self) -> PathBuf {
        self.directory.join(self.cluster_run.trim())
    }
}

/// Resolves the clusters to export
///
/// With nothing requested, every real cluster of the run is selected, plus
/// the pseudo-clusters when `include_pseudo` is set. Requested ids must exist
/// in the run. The result is sorted ascending and free of duplicates.
///
/// # Errors
///
/// Returns a case error for an unknown cluster id and a configuration error
/// when the selection is empty.
pub fn select_clusters(
    run: &ClusterRun,
    requested: &[ClusterId],
    include_pseudo: bool,
) -> Result<Vec<ClusterId>> {
    let mut selected: Vec<ClusterId> = if requested.is_empty() {
        run.sorted_clusters()
            .into_iter()
            .map(|c| c.id)
            .filter(|id| include_pseudo || !id.is_pseudo())
            .collect()
    } else {
        for id in requested {
            if run.cluster(*id).is_none() {
                return Err(ClusterExportError::Case(format!(
                    "Cluster {} is not part of cluster run '{}'",
                    id.display_name(),
                    run.name
                )));
            }
        }
        requested.to_vec()
    };

    selected.sort();
    selected.dedup();

    if selected.is_empty() {
        return Err(ClusterExportError::Configuration(
            "Please select clusters to export".to_string(),
        ));
    }
    Ok(selected)
}

/// Export engine
pub struct ExportEngine {
    case: Arc<dyn CaseSource>,
    deduplicator: Arc<dyn Deduplicator>,
    exporter: Arc<dyn BinaryExporter>,
    directories: Arc<dyn DirectoryCreator>,
}

/// Where the rows of one run go
struct RunOutput {
    manifest: ManifestWriter,
    errors: ErrorReport,
    summary: ExportSummary,
}

impl ExportEngine {
    /// Create an engine over explicit collaborators
    pub fn new(
        case: Arc<dyn CaseSource>,
        deduplicator: Arc<dyn Deduplicator>,
        exporter: Arc<dyn BinaryExporter>,
        directories: Arc<dyn DirectoryCreator>,
    ) -> Self {
        Self {
            case,
            deduplicator,
            exporter,
            directories,
        }
    }

    /// Create an engine for a file-backed case with the stock collaborators
    pub fn for_case(case: Arc<dyn CaseSource>) -> Self {
        Self::new(
            case,
            Arc::new(Md5Deduplicator),
            Arc::new(FileCopyExporter),
            Arc::new(FsDirectories),
        )
    }

    /// Execute the export
    ///
    /// Produces one subdirectory per cluster under the target directory, the
    /// manifest, and the errors report if anything failed. Per-item failures
    /// are recorded and do not stop the run; cancellation ends it early with
    /// [`RunStatus::Aborted`].
    ///
    /// # Errors
    ///
    /// Directory creation failures, report write failures and case lookup
    /// failures abort the run. Rows already written stay on disk.
    pub fn execute(&self, request: &ExportRequest, ctx: &RunContext) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let progress = ctx.progress();

        let run = self.case.cluster_run(&request.cluster_run)?;
        let clusters = request
            .clusters
            .iter()
            .map(|id| {
                run.cluster(*id).ok_or_else(|| {
                    ClusterExportError::Case(format!(
                        "Cluster {} is not part of cluster run '{}'",
                        id.display_name(),
                        run.name
                    ))
                })
            })
            .collect::<Result<Vec<&Cluster>>>()?;

        let target_directory = request.target_directory();
        tracing::info!(
            cluster_run = %run.name,
            target_directory = %target_directory.display(),
            clusters = clusters.len(),
            "Starting cluster export"
        );
        self.directories.create_all(&target_directory)?;

        let mut output = RunOutput {
            manifest: ManifestWriter::create(target_directory.join(&request.manifest_file_name))?,
            errors: ErrorReport::new(target_directory.join(&request.errors_file_name)),
            summary: ExportSummary::new(&run.name, &target_directory),
        };

        progress.main_status(&format!(
            "Exporting {} clusters from {}",
            clusters.len(),
            run.name
        ));

        for (index, cluster) in clusters.iter().enumerate() {
            progress.main_progress(index + 1, clusters.len());

            let report = self.export_cluster(&run.name, cluster, &target_directory, ctx, &mut output)?;
            let aborted = report.state == ClusterState::Aborted;
            output.summary.clusters.push(report);

            if aborted || ctx.is_cancelled() {
                tracing::warn!(cluster_run = %run.name, "Export cancelled");
                output.summary.status = RunStatus::Aborted;
                break;
            }
        }

        let RunOutput {
            manifest,
            errors,
            mut summary,
        } = output;
        tracing::debug!(
            manifest_rows = manifest.rows(),
            error_rows = errors.rows(),
            "Closing export reports"
        );
        summary.manifest_path = Some(manifest.finish()?);
        summary.errors_path = errors.finish()?;

        let summary = summary.with_duration(start_time.elapsed());
        progress.main_status(summary.status.as_str());
        if let Some(note) = summary.failure_note() {
            progress.message(&note);
        }
        summary.log_summary();

        Ok(summary)
    }

    fn export_cluster(
        &self,
        run_name: &str,
        cluster: &Cluster,
        target_directory: &Path,
        ctx: &RunContext,
        output: &mut RunOutput,
    ) -> Result<ClusterReport> {
        let progress = ctx.progress();
        let mut report = ClusterReport::new(cluster.id);
        let key = cluster_key(run_name, cluster.id);

        progress.sub_status(&format!("Exporting Cluster {}", report.name));
        let directory = target_directory.join(&report.name);
        self.directories.create_all(&directory)?;

        report.enter(ClusterState::Deduplicating);
        let items = self.case.items(&cluster.items)?;
        report.items = items.len();
        progress.message(&format!("Cluster has {} items", items.len()));

        let items = self.deduplicator.deduplicate(items);
        report.deduplicated = items.len();
        progress.message(&format!("{} items after deduplicating", items.len()));

        report.enter(ClusterState::NamingAndCollisionResolution);
        let targets = plan_targets(items, &directory);

        report.enter(ClusterState::Exporting);
        for (index, target) in targets.iter().enumerate() {
            progress.sub_progress(index + 1, targets.len());

            let attempt = self.attempt(target);
            output.manifest.append(&target.item, &key, &attempt)?;
            match &attempt {
                ExportAttempt::Exported(_) => {
                    report.exported += 1;
                    output.summary.record_export();
                }
                ExportAttempt::Failed(message) => {
                    report.failed += 1;
                    output.summary.record_failure(ItemFailure {
                        guid: target.item.guid.clone(),
                        cluster_key: key.clone(),
                        message: message.clone(),
                    });
                    output.errors.append(&target.item.guid, message)?;
                }
            }

            if ctx.is_cancelled() {
                report.enter(ClusterState::Aborted);
                return Ok(report);
            }
        }

        report.enter(ClusterState::Done);
        tracing::debug!(
            cluster = %report.name,
            exported = report.exported,
            failed = report.failed,
            "Cluster exported"
        );
        Ok(report)
    }

    fn attempt(&self, target: &ExportTarget) -> ExportAttempt {
        match self.exporter.export_item(&target.item, &target.path) {
            Ok(()) => {
                tracing::trace!(item_guid = %target.item.guid, path = %target.path.display(), "Exported");
                ExportAttempt::Exported(target.path.clone())
            }
            Err(failure) => {
                tracing::warn!(
                    item_guid = %target.item.guid,
                    path = %target.path.display(),
                    error = %failure,
                    "Item export failed"
                );
                ExportAttempt::Failed(failure.message)
            }
        }
    }
}
