//! Report Aggregator
//!
//! Merges the `summary-report.xml` of every unit sub-directory into one
//! aggregate report:
//! - [`xml`] - owned element tree over `quick-xml`
//! - [`counters`] - insertion-ordered counter maps
//! - [`unit`] - parsing of one unit report
//! - [`aggregate`] - folding and rendering of the aggregate

pub mod aggregate;
pub mod counters;
pub mod unit;
pub mod xml;

pub use aggregate::AggregateSummary;
pub use counters::CounterMap;
pub use unit::{ReportUnit, UnitDetails, REPORT_FILE_NAME};

use crate::config::{ClusterExportConfig, InvalidReportPolicy, UnknownStatisticPolicy};
use crate::core::context::RunContext;
use crate::core::export::RunStatus;
use crate::domain::{ReportError, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Inputs of one aggregation
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    /// Directory holding one sub-directory per unit
    pub reports_directory: PathBuf,

    /// Directory receiving the aggregate report
    pub output_directory: PathBuf,

    /// Unit type, e.g. `Custodian`
    pub unit_type: String,

    /// Start of the overall run
    pub start_time: DateTime<Local>,

    /// Handling of unit reports that fail to parse
    pub invalid_report_policy: InvalidReportPolicy,

    /// Handling of unknown file statistics
    pub unknown_statistic_policy: UnknownStatisticPolicy,
}

impl SummaryRequest {
    /// Request with default policies and the `Custodian` unit type, starting now
    pub fn new(reports_directory: impl Into<PathBuf>, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            reports_directory: reports_directory.into(),
            output_directory: output_directory.into(),
            unit_type: "Custodian".to_string(),
            start_time: Local::now(),
            invalid_report_policy: InvalidReportPolicy::default(),
            unknown_statistic_policy: UnknownStatisticPolicy::default(),
        }
    }

    /// Request from the `[summary]` and `[export]` configuration sections
    pub fn from_config(config: &ClusterExportConfig, start_time: DateTime<Local>) -> Self {
        Self {
            reports_directory: config.summary.reports_directory(&config.export),
            output_directory: config.summary.output_directory(&config.export),
            unit_type: config.summary.unit_type.clone(),
            start_time,
            invalid_report_policy: config.summary.invalid_report_policy,
            unknown_statistic_policy: config.summary.unknown_statistic_policy,
        }
    }
}

/// A unit report left out under the skip policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedReport {
    /// Report file
    pub path: PathBuf,

    /// Why it was skipped
    pub reason: String,
}

/// Result of an aggregation
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    /// How the aggregation ended
    pub status: RunStatus,

    /// Aggregate report, absent when aborted
    pub report_path: Option<PathBuf>,

    /// Units folded into the aggregate, in order
    pub units: Vec<String>,

    /// Unit reports that were skipped
    pub skipped: Vec<SkippedReport>,
}

/// Finds `<dir>/<unit>/summary-report.xml` files, sorted by unit name
///
/// # Errors
///
/// Returns [`ReportError::Read`] if the directory cannot be listed.
pub fn discover_reports(directory: &Path) -> std::result::Result<Vec<PathBuf>, ReportError> {
    let read_error = |e: std::io::Error| ReportError::Read {
        path: directory.display().to_string(),
        message: e.to_string(),
    };

    let mut units = Vec::new();
    for entry in std::fs::read_dir(directory).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let report = entry.path().join(REPORT_FILE_NAME);
        if entry.path().is_dir() && report.is_file() {
            units.push((entry.file_name(), report));
        }
    }

    units.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(units.into_iter().map(|(_, report)| report).collect())
}

/// Aggregates every unit report under the reports directory
///
/// Unit reports are folded in unit-name order. A report that fails to parse
/// is skipped or aborts the aggregation, depending on the request's policy.
/// Cancellation between reports stops without writing anything.
///
/// # Errors
///
/// Returns [`ReportError::NoReports`] when no unit report could be used, the
/// parse error of a bad report under [`InvalidReportPolicy::Abort`], and
/// write failures of the aggregate report.
pub fn aggregate_reports(request: &SummaryRequest, ctx: &RunContext) -> Result<SummaryOutcome> {
    let progress = ctx.progress();
    progress.main_status(&format!(
        "Summarizing reports in {}",
        request.reports_directory.display()
    ));

    let reports = discover_reports(&request.reports_directory)?;
    if reports.is_empty() {
        return Err(ReportError::NoReports(request.reports_directory.display().to_string()).into());
    }

    let mut summary = AggregateSummary::new(
        request.start_time,
        &request.output_directory,
        &request.unit_type,
    );
    let mut outcome = SummaryOutcome {
        status: RunStatus::Completed,
        report_path: None,
        units: Vec::new(),
        skipped: Vec::new(),
    };

    for (index, path) in reports.iter().enumerate() {
        if ctx.is_cancelled() {
            tracing::warn!("Summary aggregation cancelled");
            outcome.status = RunStatus::Aborted;
            progress.main_status(outcome.status.as_str());
            return Ok(outcome);
        }

        progress.sub_progress(index + 1, reports.len());
        progress.message(&format!("Reading {}", path.display()));

        match ReportUnit::load(path, request.unknown_statistic_policy) {
            Ok(unit) => {
                outcome.units.push(unit.name.clone());
                summary.fold(unit);
            }
            Err(e) => match request.invalid_report_policy {
                InvalidReportPolicy::Skip => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unit report");
                    outcome.skipped.push(SkippedReport {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
                InvalidReportPolicy::Abort => return Err(e.into()),
            },
        }
    }

    if summary.units() == 0 {
        return Err(ReportError::NoReports(request.reports_directory.display().to_string()).into());
    }

    progress.sub_status(&format!(
        "Writing {}",
        request.output_directory.join(REPORT_FILE_NAME).display()
    ));
    outcome.report_path = Some(summary.write(&request.output_directory)?);

    progress.main_status(outcome.status.as_str());
    tracing::info!(
        units = outcome.units.len(),
        skipped = outcome.skipped.len(),
        "Summary aggregation finished"
    );
    Ok(outcome)
}
