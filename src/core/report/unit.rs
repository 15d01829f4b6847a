//! Per-unit summary reports
//!
//! A unit is one sub-export (for example one custodian) with its own
//! `summary-report.xml`. Parsing maps the document onto typed counters:
//! four fixed export statistics, the file statistics checked against a
//! declared set of names, and the mime type table.

use super::counters::CounterMap;
use super::xml::{parse_document, XmlElement};
use crate::config::UnknownStatisticPolicy;
use crate::domain::ReportError;
use std::path::Path;

/// File name of a summary report
pub const REPORT_FILE_NAME: &str = "summary-report.xml";

/// Export statistics read from every unit, in output order
pub const EXPORT_STATISTICS_FIELDS: [&str; 4] = [
    "SelectedItems",
    "ExcludedCount",
    "TotalItemsToExport",
    "FailedItems",
];

/// File statistic the throughput rate is computed from
pub const NATIVE_FILES_EXPORTED: &str = "NativeFilesExported";

/// File statistics known to the aggregator
pub const KNOWN_FILE_STATISTICS: [&str; 8] = [
    NATIVE_FILES_EXPORTED,
    "TextFilesExported",
    "PdfFilesExported",
    "ImageFilesExported",
    "ThumbnailFilesExported",
    "XhtmlReportFilesExported",
    "LoadFileItems",
    "FailedFiles",
];

/// One row of the `<UnitType>Details` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDetails {
    /// Unit name (directory name)
    pub name: String,

    /// Export duration in seconds
    pub export_duration: i64,

    /// The four export statistics, keyed by their report names
    pub statistics: CounterMap,
}

impl UnitDetails {
    /// Detail element; statistic attributes start with a lower-case letter
    pub fn to_element(&self, unit_type: &str) -> XmlElement {
        let mut element = XmlElement::new(unit_type)
            .with_attribute("name", self.name.as_str())
            .with_attribute("exportDuration", self.export_duration.to_string());
        for (field, value) in self.statistics.iter() {
            element = element.with_attribute(lower_first(field), value.to_string());
        }
        element
    }
}

/// Lower-cases the first character: `SelectedItems` becomes `selectedItems`
pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A parsed unit report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportUnit {
    /// Unit name, taken from the directory holding the report
    pub name: String,

    /// `version` attribute of the root element
    pub version: Option<String>,

    /// `architecture` attribute of the root element
    pub architecture: Option<String>,

    /// Export duration in seconds
    pub export_duration: i64,

    /// `ExportConfiguration` subtree, if the report has one
    pub configuration: Option<XmlElement>,

    /// Export statistics
    pub export_statistics: CounterMap,

    /// File statistics
    pub file_statistics: CounterMap,

    /// Mime type to item count
    pub mime_types: CounterMap,
}

impl ReportUnit {
    /// Reads and parses `<unit dir>/summary-report.xml`
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] if the file cannot be read or parsed.
    pub fn load(path: &Path, policy: UnknownStatisticPolicy) -> Result<Self, ReportError> {
        let source = path.display().to_string();
        let xml = std::fs::read_to_string(path).map_err(|e| ReportError::Read {
            path: source.clone(),
            message: e.to_string(),
        })?;
        let name = unit_name(path);
        Self::parse(&xml, &name, &source, policy)
    }

    /// Parses report text for the named unit
    ///
    /// A counter named twice within one report keeps its last value.
    ///
    /// # Errors
    ///
    /// Returns a [`ReportError`] for malformed XML, a missing `Nuix/Export`
    /// element, duration or export statistic, a non-numeric counter, or an
    /// unknown file statistic under [`UnknownStatisticPolicy::Reject`].
    pub fn parse(
        xml: &str,
        name: &str,
        source: &str,
        policy: UnknownStatisticPolicy,
    ) -> Result<Self, ReportError> {
        let root = parse_document(xml, source)?;
        let missing = |element: &str| ReportError::MissingElement {
            path: source.to_string(),
            element: element.to_string(),
        };

        if root.name != "Nuix" {
            return Err(missing("Nuix"));
        }
        let export = root.child("Export").ok_or_else(|| missing("Nuix/Export"))?;

        let duration = export
            .attribute("exportDuration")
            .ok_or_else(|| missing("Export@exportDuration"))?;
        let export_duration = parse_count(duration, "exportDuration", source)?;

        let mut export_statistics = CounterMap::new();
        for field in EXPORT_STATISTICS_FIELDS {
            let path = format!("ExportStatistics/{field}");
            let element = export.find(&path).ok_or_else(|| missing(&path))?;
            export_statistics.set(field, parse_count(&element.text(), field, source)?);
        }

        let mut file_statistics = CounterMap::new();
        if let Some(stats) = export.child("FileStatistics") {
            for element in stats.elements() {
                let field = element.name.as_str();
                if !KNOWN_FILE_STATISTICS.contains(&field) {
                    match policy {
                        UnknownStatisticPolicy::Keep => {
                            tracing::debug!(unit = name, field, "Keeping unknown file statistic");
                        }
                        UnknownStatisticPolicy::Ignore => {
                            tracing::debug!(unit = name, field, "Ignoring unknown file statistic");
                            continue;
                        }
                        UnknownStatisticPolicy::Reject => {
                            return Err(ReportError::UnknownStatistic {
                                path: source.to_string(),
                                field: field.to_string(),
                            });
                        }
                    }
                }
                file_statistics.set(field, parse_count(&element.text(), field, source)?);
            }
        }

        let mut mime_types = CounterMap::new();
        if let Some(mimes) = export.find("MimeTypeStatistics/MimeTypes") {
            for mime in mimes.elements() {
                let mime_name = mime
                    .attribute("name")
                    .ok_or_else(|| missing("MimeType@name"))?;
                let count = mime
                    .attribute("count")
                    .ok_or_else(|| missing("MimeType@count"))?;
                mime_types.set(mime_name, parse_count(count, mime_name, source)?);
            }
        }

        Ok(Self {
            name: name.to_string(),
            version: root.attribute("version").map(String::from),
            architecture: root.attribute("architecture").map(String::from),
            export_duration,
            configuration: export.child("ExportConfiguration").cloned(),
            export_statistics,
            file_statistics,
            mime_types,
        })
    }

    /// Detail record of this unit
    pub fn details(&self) -> UnitDetails {
        UnitDetails {
            name: self.name.clone(),
            export_duration: self.export_duration,
            statistics: self.export_statistics.clone(),
        }
    }
}

/// Unit name: the name of the directory holding the report
pub fn unit_name(report_path: &Path) -> String {
    report_path
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parses an integer counter; decimal values are truncated and empty text is zero
fn parse_count(value: &str, field: &str, source: &str) -> Result<i64, ReportError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    if let Ok(n) = value.parse::<i64>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f.trunc() as i64),
        _ => Err(ReportError::InvalidNumber {
            path: source.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Nuix version="9.10.1" architecture="amd64">
  <Export startTime="2024-03-01 10:00:00 +0000" endTime="2024-03-01 10:00:42 +0000" exportDuration="42">
    <ExportConfiguration>
      <ExportDirectory>D:\export\Smith</ExportDirectory>
      <Products natives="true"/>
    </ExportConfiguration>
    <ExportStatistics>
      <SelectedItems>10</SelectedItems>
      <ExcludedCount>1</ExcludedCount>
      <TotalItemsToExport>9</TotalItemsToExport>
      <FailedItems>2</FailedItems>
    </ExportStatistics>
    <FileStatistics>
      <NativeFilesExported>7</NativeFilesExported>
      <TextFilesExported>9</TextFilesExported>
      <CustomFiles>3</CustomFiles>
    </FileStatistics>
    <MimeTypeStatistics>
      <MimeTypes>
        <MimeType name="application/pdf" count="4"/>
        <MimeType name="message/rfc822" count="5"/>
      </MimeTypes>
    </MimeTypeStatistics>
  </Export>
</Nuix>
"#;

    fn parse(xml: &str, policy: UnknownStatisticPolicy) -> Result<ReportUnit, ReportError> {
        ReportUnit::parse(xml, "Smith", "Smith/summary-report.xml", policy)
    }

    #[test]
    fn test_parse_report() {
        let unit = parse(REPORT, UnknownStatisticPolicy::Keep).unwrap();

        assert_eq!(unit.name, "Smith");
        assert_eq!(unit.version.as_deref(), Some("9.10.1"));
        assert_eq!(unit.architecture.as_deref(), Some("amd64"));
        assert_eq!(unit.export_duration, 42);
        assert_eq!(unit.export_statistics.get("SelectedItems"), 10);
        assert_eq!(unit.export_statistics.get("FailedItems"), 2);
        assert_eq!(unit.file_statistics.get(NATIVE_FILES_EXPORTED), 7);
        assert_eq!(unit.file_statistics.get("CustomFiles"), 3);
        assert_eq!(unit.mime_types.get("message/rfc822"), 5);

        let config = unit.configuration.unwrap();
        assert_eq!(config.child("ExportDirectory").unwrap().text(), "D:\\export\\Smith");
    }

    #[test]
    fn test_unknown_statistic_policies() {
        let unit = parse(REPORT, UnknownStatisticPolicy::Ignore).unwrap();
        assert_eq!(unit.file_statistics.len(), 2);
        assert_eq!(unit.file_statistics.get("CustomFiles"), 0);

        let err = parse(REPORT, UnknownStatisticPolicy::Reject).unwrap_err();
        assert!(matches!(err, ReportError::UnknownStatistic { ref field, .. } if field == "CustomFiles"));
    }

    #[test]
    fn test_details_lower_case_attributes() {
        let unit = parse(REPORT, UnknownStatisticPolicy::Keep).unwrap();
        let element = unit.details().to_element("Custodian");

        assert_eq!(element.name, "Custodian");
        let names: Vec<&str> = element.attributes.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "name",
                "exportDuration",
                "selectedItems",
                "excludedCount",
                "totalItemsToExport",
                "failedItems"
            ]
        );
        assert_eq!(element.attribute("failedItems"), Some("2"));
    }

    #[test]
    fn test_missing_export_statistic() {
        let xml = REPORT.replace("<ExcludedCount>1</ExcludedCount>", "");
        let err = parse(&xml, UnknownStatisticPolicy::Keep).unwrap_err();
        assert!(
            matches!(err, ReportError::MissingElement { ref element, .. } if element == "ExportStatistics/ExcludedCount")
        );
    }

    #[test]
    fn test_missing_optional_sections() {
        let xml = r#"<Nuix><Export exportDuration="5"><ExportStatistics>
            <SelectedItems>1</SelectedItems><ExcludedCount>0</ExcludedCount>
            <TotalItemsToExport>1</TotalItemsToExport><FailedItems>0</FailedItems>
            </ExportStatistics></Export></Nuix>"#;
        let unit = parse(xml, UnknownStatisticPolicy::Keep).unwrap();

        assert!(unit.file_statistics.is_empty());
        assert!(unit.mime_types.is_empty());
        assert!(unit.configuration.is_none());
        assert!(unit.version.is_none());
    }

    #[test]
    fn test_invalid_numbers() {
        let xml = REPORT.replace("exportDuration=\"42\"", "exportDuration=\"soon\"");
        let err = parse(&xml, UnknownStatisticPolicy::Keep).unwrap_err();
        assert!(matches!(err, ReportError::InvalidNumber { .. }));

        let xml = REPORT.replace("exportDuration=\"42\"", "exportDuration=\"42.9\"");
        assert_eq!(parse(&xml, UnknownStatisticPolicy::Keep).unwrap().export_duration, 42);
    }

    #[test]
    fn test_empty_counter_is_zero() {
        let xml = REPORT.replace("<FailedItems>2</FailedItems>", "<FailedItems/>");
        let unit = parse(&xml, UnknownStatisticPolicy::Keep).unwrap();
        assert_eq!(unit.export_statistics.get("FailedItems"), 0);
        assert_eq!(unit.export_statistics.get("SelectedItems"), 10);

        let xml = REPORT.replace("count=\"4\"", "count=\"\"");
        let unit = parse(&xml, UnknownStatisticPolicy::Keep).unwrap();
        assert_eq!(unit.mime_types.get("application/pdf"), 0);
    }

    #[test]
    fn test_repeated_name_keeps_last_value() {
        let xml = REPORT
            .replace(
                "<TextFilesExported>9</TextFilesExported>",
                "<TextFilesExported>9</TextFilesExported><TextFilesExported>4</TextFilesExported>",
            )
            .replace(
                "<MimeType name=\"message/rfc822\" count=\"5\"/>",
                "<MimeType name=\"message/rfc822\" count=\"5\"/><MimeType name=\"application/pdf\" count=\"6\"/>",
            );
        let unit = parse(&xml, UnknownStatisticPolicy::Keep).unwrap();

        assert_eq!(unit.file_statistics.get("TextFilesExported"), 4);
        assert_eq!(unit.file_statistics.len(), 3);
        assert_eq!(unit.mime_types.get("application/pdf"), 6);
        let order: Vec<&str> = unit.mime_types.iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["application/pdf", "message/rfc822"]);
    }

    #[test]
    fn test_wrong_root() {
        let err = parse("<Report/>", UnknownStatisticPolicy::Keep).unwrap_err();
        assert!(matches!(err, ReportError::MissingElement { .. }));
    }

    #[test]
    fn test_unit_name_from_directory() {
        let path = PathBuf::from("/exports/Smith/summary-report.xml");
        assert_eq!(unit_name(&path), "Smith");
    }

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("SelectedItems"), "selectedItems");
        assert_eq!(lower_first("x"), "x");
        assert_eq!(lower_first(""), "");
    }
}
