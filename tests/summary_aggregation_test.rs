//! Integration tests for summary report aggregation
//!
//! These tests verify that:
//! - Counters of every unit are summed into the aggregate
//! - The throughput rate is computed over the summed duration
//! - Unreadable unit reports are skipped or abort, per policy
//! - Aggregating the same inputs twice yields the same document, times aside

use cluster_export::config::{InvalidReportPolicy, UnknownStatisticPolicy};
use cluster_export::core::context::RunContext;
use cluster_export::core::export::RunStatus;
use cluster_export::core::report::xml::{parse_document, XmlElement, XmlNode};
use cluster_export::core::report::{aggregate_reports, SummaryRequest, REPORT_FILE_NAME};
use cluster_export::domain::{ClusterExportError, ReportError};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn report(duration: i64, failed: i64, native: i64, mime: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Nuix version="9.10.1" architecture="amd64">
  <Export exportDuration="{duration}">
    <ExportConfiguration>
      <ExportDirectory>D:\unit</ExportDirectory>
    </ExportConfiguration>
    <ExportStatistics>
      <SelectedItems>10</SelectedItems>
      <ExcludedCount>0</ExcludedCount>
      <TotalItemsToExport>10</TotalItemsToExport>
      <FailedItems>{failed}</FailedItems>
    </ExportStatistics>
    <FileStatistics>
      <NativeFilesExported>{native}</NativeFilesExported>
    </FileStatistics>
    <MimeTypeStatistics>
      <MimeTypes>
        <MimeType name="{mime}" count="3"/>
      </MimeTypes>
    </MimeTypeStatistics>
  </Export>
</Nuix>
"#
    )
}

fn write_unit(root: &Path, name: &str, body: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(REPORT_FILE_NAME), body).unwrap();
}

fn read_aggregate(path: &Path) -> XmlElement {
    let xml = fs::read_to_string(path).unwrap();
    parse_document(&xml, &path.display().to_string()).unwrap()
}

fn text_at(root: &XmlElement, path: &str) -> String {
    root.find(path).unwrap().text()
}

/// Drops the attributes that depend on when the aggregation ran
fn without_times(mut root: XmlElement) -> XmlElement {
    for node in &mut root.children {
        if let XmlNode::Element(export) = node {
            export.attributes.retain(|(name, _)| {
                !matches!(
                    name.as_str(),
                    "startTime" | "endTime" | "processingDuration"
                )
            });
        }
    }
    root
}

#[test]
fn test_counters_are_summed() {
    let reports = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_unit(reports.path(), "Smith", &report(40, 2, 30, "application/pdf"));
    write_unit(reports.path(), "Jones", &report(20, 3, 12, "message/rfc822"));

    let request = SummaryRequest::new(reports.path(), output.path());
    let outcome = aggregate_reports(&request, &RunContext::detached()).unwrap();

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.units, vec!["Jones", "Smith"]);

    let root = read_aggregate(outcome.report_path.as_ref().unwrap());
    let export = root.child("Export").unwrap();
    assert_eq!(export.attribute("exportDuration"), Some("60"));
    assert_eq!(text_at(export, "ExportStatistics/FailedItems"), "5");
    assert_eq!(text_at(export, "ExportStatistics/SelectedItems"), "20");
    assert_eq!(text_at(export, "FileStatistics/NativeFilesExported"), "42");
    assert_eq!(text_at(export, "ThroughputStatistics/NativeDocRate"), "0.7");
    assert_eq!(
        text_at(export, "ExportConfiguration/ExportDirectory"),
        output.path().display().to_string()
    );

    let details: Vec<&XmlElement> = export.child("CustodianDetails").unwrap().elements().collect();
    assert_eq!(details.len(), 2);
    assert_eq!(details[0].attribute("name"), Some("Jones"));
    assert_eq!(details[0].attribute("failedItems"), Some("3"));
    assert_eq!(details[1].attribute("exportDuration"), Some("40"));

    let mimes: Vec<&XmlElement> = export
        .find("MimeTypeStatistics/MimeTypes")
        .unwrap()
        .elements()
        .collect();
    assert_eq!(mimes.len(), 2);
    assert_eq!(mimes[0].attribute("name"), Some("message/rfc822"));
}

#[test]
fn test_aggregation_is_repeatable() {
    let reports = TempDir::new().unwrap();
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    write_unit(reports.path(), "A", &report(5, 0, 5, "text/plain"));
    write_unit(reports.path(), "B", &report(7, 1, 6, "text/plain"));

    let mut request = SummaryRequest::new(reports.path(), first.path());
    let one = aggregate_reports(&request, &RunContext::detached()).unwrap();
    request.output_directory = second.path().to_path_buf();
    let two = aggregate_reports(&request, &RunContext::detached()).unwrap();

    let mut one = without_times(read_aggregate(one.report_path.as_ref().unwrap()));
    let mut two = without_times(read_aggregate(two.report_path.as_ref().unwrap()));
    // The export directory is the output directory, which differs by construction
    for root in [&mut one, &mut two] {
        if let Some(XmlNode::Element(export)) = root.children.first_mut() {
            if let Some(config) = export.child_mut("ExportConfiguration") {
                config.children.clear();
            }
        }
    }
    assert_eq!(one, two);
}

#[test]
fn test_zero_duration_rate() {
    let reports = TempDir::new().unwrap();
    write_unit(reports.path(), "A", &report(0, 0, 5, "text/plain"));

    let request = SummaryRequest::new(reports.path(), reports.path());
    let outcome = aggregate_reports(&request, &RunContext::detached()).unwrap();

    let root = read_aggregate(outcome.report_path.as_ref().unwrap());
    assert_eq!(
        text_at(&root, "Export/ThroughputStatistics/NativeDocRate"),
        "0.0"
    );
}

#[test]
fn test_skip_policy_leaves_out_bad_reports() {
    let reports = TempDir::new().unwrap();
    write_unit(reports.path(), "A", &report(10, 1, 5, "text/plain"));
    write_unit(reports.path(), "B", "<Nuix><Export>");

    let request = SummaryRequest::new(reports.path(), reports.path());
    let outcome = aggregate_reports(&request, &RunContext::detached()).unwrap();

    assert_eq!(outcome.units, vec!["A"]);
    assert_eq!(outcome.skipped.len(), 1);
    assert!(outcome.skipped[0].path.ends_with(Path::new("B").join(REPORT_FILE_NAME)));

    let root = read_aggregate(outcome.report_path.as_ref().unwrap());
    assert_eq!(text_at(&root, "Export/ExportStatistics/FailedItems"), "1");
}

#[test]
fn test_abort_policy_propagates_parse_error() {
    let reports = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_unit(reports.path(), "A", &report(10, 1, 5, "text/plain"));
    write_unit(reports.path(), "B", "<Nuix><Export>");

    let mut request = SummaryRequest::new(reports.path(), output.path());
    request.invalid_report_policy = InvalidReportPolicy::Abort;
    let result = aggregate_reports(&request, &RunContext::detached());

    assert!(matches!(result, Err(ClusterExportError::Report(_))));
    assert!(!output.path().join(REPORT_FILE_NAME).exists());
}

#[test]
fn test_all_reports_unusable() {
    let reports = TempDir::new().unwrap();
    write_unit(reports.path(), "A", "not xml at all <");

    let request = SummaryRequest::new(reports.path(), reports.path());
    let result = aggregate_reports(&request, &RunContext::detached());

    assert!(matches!(
        result,
        Err(ClusterExportError::Report(ReportError::NoReports(_)))
    ));
}

#[test]
fn test_reject_unknown_statistic() {
    let reports = TempDir::new().unwrap();
    let body = report(10, 0, 5, "text/plain").replace(
        "<NativeFilesExported>",
        "<HologramsExported>1</HologramsExported><NativeFilesExported>",
    );
    write_unit(reports.path(), "A", &body);

    let mut request = SummaryRequest::new(reports.path(), reports.path());
    request.invalid_report_policy = InvalidReportPolicy::Abort;
    request.unknown_statistic_policy = UnknownStatisticPolicy::Reject;
    let result = aggregate_reports(&request, &RunContext::detached());
    assert!(matches!(
        result,
        Err(ClusterExportError::Report(ReportError::UnknownStatistic { .. }))
    ));

    request.unknown_statistic_policy = UnknownStatisticPolicy::Keep;
    let outcome = aggregate_reports(&request, &RunContext::detached()).unwrap();
    let root = read_aggregate(outcome.report_path.as_ref().unwrap());
    assert_eq!(text_at(&root, "Export/FileStatistics/HologramsExported"), "1");
}
