//! Aggregate summary
//!
//! Folds parsed unit reports into one summary and renders it as the
//! aggregate `summary-report.xml`.

use super::counters::CounterMap;
use super::unit::{ReportUnit, UnitDetails, NATIVE_FILES_EXPORTED, REPORT_FILE_NAME};
use super::xml::{write_document, XmlElement};
use crate::domain::ReportError;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Timestamp format of `startTime` and `endTime`
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Version written when no unit report carries one
pub const UNKNOWN_VERSION: &str = "unknown";

const EXPORT_DIRECTORY: &str = "ExportDirectory";

/// Running totals over all folded units
#[derive(Debug, Clone)]
pub struct AggregateSummary {
    start_time: DateTime<Local>,
    export_directory: PathBuf,
    unit_type: String,
    version: Option<String>,
    architecture: Option<String>,
    total_duration: i64,
    configuration: Option<XmlElement>,
    export_statistics: CounterMap,
    file_statistics: CounterMap,
    mime_types: CounterMap,
    details: Vec<UnitDetails>,
}

impl AggregateSummary {
    /// Starts an empty aggregate
    ///
    /// `export_directory` replaces the `ExportDirectory` of the captured
    /// configuration; `unit_type` names the details element.
    pub fn new(
        start_time: DateTime<Local>,
        export_directory: impl Into<PathBuf>,
        unit_type: impl Into<String>,
    ) -> Self {
        Self {
            start_time,
            export_directory: export_directory.into(),
            unit_type: unit_type.into(),
            version: None,
            architecture: None,
            total_duration: 0,
            configuration: None,
            export_statistics: CounterMap::new(),
            file_statistics: CounterMap::new(),
            mime_types: CounterMap::new(),
            details: Vec::new(),
        }
    }

    /// Adds one unit
    ///
    /// Durations and counters are summed. Configuration, version and
    /// architecture are taken from the first unit that has them.
    pub fn fold(&mut self, unit: ReportUnit) {
        tracing::debug!(unit = %unit.name, duration = unit.export_duration, "Folding unit report");

        self.total_duration += unit.export_duration;
        self.export_statistics.merge(&unit.export_statistics);
        self.file_statistics.merge(&unit.file_statistics);
        self.mime_types.merge(&unit.mime_types);
        self.details.push(unit.details());

        if self.configuration.is_none() {
            self.configuration = unit.configuration;
        }
        if self.version.is_none() {
            self.version = unit.version;
        }
        if self.architecture.is_none() {
            self.architecture = unit.architecture;
        }
    }

    /// Number of folded units
    pub fn units(&self) -> usize {
        self.details.len()
    }

    /// Summed export duration in seconds
    pub fn total_duration(&self) -> i64 {
        self.total_duration
    }

    /// Merged export statistics
    pub fn export_statistics(&self) -> &CounterMap {
        &self.export_statistics
    }

    /// Merged file statistics
    pub fn file_statistics(&self) -> &CounterMap {
        &self.file_statistics
    }

    /// Merged mime type counts
    pub fn mime_types(&self) -> &CounterMap {
        &self.mime_types
    }

    /// Detail records in fold order
    pub fn details(&self) -> &[UnitDetails] {
        &self.details
    }

    /// Native files exported per second of summed export duration
    ///
    /// A zero summed duration yields `0.0`.
    pub fn native_doc_rate(&self) -> f64 {
        let native = self.file_statistics.get(NATIVE_FILES_EXPORTED);
        if self.total_duration == 0 {
            tracing::warn!(
                native_files = native,
                "Summed export duration is zero, reporting NativeDocRate as 0"
            );
            return 0.0;
        }
        native as f64 / self.total_duration as f64
    }

    /// Builds the aggregate document
    pub fn to_xml(&self, end_time: DateTime<Local>) -> XmlElement {
        let processing = (end_time - self.start_time).num_milliseconds() as f64 / 1000.0;

        let export = XmlElement::new("Export")
            .with_attribute("startTime", self.start_time.format(TIME_FORMAT).to_string())
            .with_attribute("endTime", end_time.format(TIME_FORMAT).to_string())
            .with_attribute("exportDuration", self.total_duration.to_string())
            .with_attribute("processingDuration", format_float(processing))
            .with_child(self.configuration_element())
            .with_child(statistics_element("ExportStatistics", &self.export_statistics))
            .with_child(self.details_element())
            .with_child(statistics_element("FileStatistics", &self.file_statistics))
            .with_child(
                XmlElement::new("ThroughputStatistics").with_child(
                    XmlElement::new("NativeDocRate").with_text(format_float(self.native_doc_rate())),
                ),
            )
            .with_child(self.mime_types_element());

        XmlElement::new("Nuix")
            .with_attribute(
                "version",
                self.version.as_deref().unwrap_or(UNKNOWN_VERSION),
            )
            .with_attribute(
                "architecture",
                self.architecture
                    .as_deref()
                    .unwrap_or(std::env::consts::ARCH),
            )
            .with_child(export)
    }

    /// Writes `summary-report.xml` into `output_directory`
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Write`] if the directory or file cannot be written.
    pub fn write(self, output_directory: &Path) -> Result<PathBuf, ReportError> {
        let xml = write_document(&self.to_xml(Local::now()))?;

        std::fs::create_dir_all(output_directory).map_err(|e| {
            ReportError::Write(format!("{}: {}", output_directory.display(), e))
        })?;
        let path = output_directory.join(REPORT_FILE_NAME);
        std::fs::write(&path, xml)
            .map_err(|e| ReportError::Write(format!("{}: {}", path.display(), e)))?;

        tracing::info!(path = %path.display(), units = self.details.len(), "Summary report written");
        Ok(path)
    }

    fn configuration_element(&self) -> XmlElement {
        let directory = self.export_directory.display().to_string();
        let mut configuration = self
            .configuration
            .clone()
            .unwrap_or_else(|| XmlElement::new("ExportConfiguration"));

        if configuration.child(EXPORT_DIRECTORY).is_none() {
            return configuration.with_child(XmlElement::new(EXPORT_DIRECTORY).with_text(directory));
        }
        if let Some(element) = configuration.child_mut(EXPORT_DIRECTORY) {
            element.set_text(directory);
        }
        configuration
    }

    fn details_element(&self) -> XmlElement {
        self.details.iter().fold(
            XmlElement::new(format!("{}Details", self.unit_type)),
            |element, details| element.with_child(details.to_element(&self.unit_type)),
        )
    }

    fn mime_types_element(&self) -> XmlElement {
        let mime_types =
            self.mime_types
                .iter()
                .fold(XmlElement::new("MimeTypes"), |element, (name, count)| {
                    element.with_child(
                        XmlElement::new("MimeType")
                            .with_attribute("name", name)
                            .with_attribute("count", count.to_string()),
                    )
                });
        XmlElement::new("MimeTypeStatistics").with_child(mime_types)
    }
}

fn statistics_element(name: &str, counters: &CounterMap) -> XmlElement {
    counters.iter().fold(XmlElement::new(name), |element, (field, value)| {
        element.with_child(XmlElement::new(field).with_text(value.to_string()))
    })
}

/// Renders a float with at least one decimal, e.g. `5.0`
fn format_float(value: f64) -> String {
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::xml::parse_document;
    use chrono::{Duration, TimeZone};

    fn unit(name: &str, duration: i64, failed: i64, native: i64) -> ReportUnit {
        let mut export_statistics = CounterMap::new();
        export_statistics.add("SelectedItems", 10);
        export_statistics.add("ExcludedCount", 0);
        export_statistics.add("TotalItemsToExport", 10);
        export_statistics.add("FailedItems", failed);

        let mut file_statistics = CounterMap::new();
        file_statistics.add(NATIVE_FILES_EXPORTED, native);

        let mut mime_types = CounterMap::new();
        mime_types.add("application/pdf", native);

        ReportUnit {
            name: name.to_string(),
            version: Some("9.10".to_string()),
            architecture: Some("amd64".to_string()),
            export_duration: duration,
            configuration: Some(
                XmlElement::new("ExportConfiguration")
                    .with_child(XmlElement::new(EXPORT_DIRECTORY).with_text(format!("/old/{name}"))),
            ),
            export_statistics,
            file_statistics,
            mime_types,
        }
    }

    fn start() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_fold_sums_counters() {
        let mut summary = AggregateSummary::new(start(), "/exports", "Custodian");
        summary.fold(unit("Jones", 10, 2, 20));
        summary.fold(unit("Smith", 30, 3, 60));

        assert_eq!(summary.units(), 2);
        assert_eq!(summary.total_duration(), 40);
        assert_eq!(summary.export_statistics().get("FailedItems"), 5);
        assert_eq!(summary.export_statistics().get("SelectedItems"), 20);
        assert_eq!(summary.file_statistics().get(NATIVE_FILES_EXPORTED), 80);
        assert_eq!(summary.mime_types().get("application/pdf"), 80);
        assert_eq!(summary.native_doc_rate(), 2.0);
        assert_eq!(summary.details()[1].name, "Smith");
    }

    #[test]
    fn test_zero_duration_rate() {
        let mut summary = AggregateSummary::new(start(), "/exports", "Custodian");
        summary.fold(unit("Jones", 0, 0, 5));
        assert_eq!(summary.native_doc_rate(), 0.0);
    }

    #[test]
    fn test_xml_shape() {
        let mut summary = AggregateSummary::new(start(), "/exports", "Custodian");
        summary.fold(unit("Jones", 10, 2, 50));

        let root = summary.to_xml(start() + Duration::milliseconds(1500));
        assert_eq!(root.attribute("version"), Some("9.10"));

        let export = root.child("Export").unwrap();
        assert_eq!(export.attribute("exportDuration"), Some("10"));
        assert_eq!(export.attribute("processingDuration"), Some("1.5"));
        assert_eq!(
            export.attribute("startTime"),
            Some(start().format(TIME_FORMAT).to_string().as_str())
        );

        let names: Vec<&str> = export.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ExportConfiguration",
                "ExportStatistics",
                "CustodianDetails",
                "FileStatistics",
                "ThroughputStatistics",
                "MimeTypeStatistics"
            ]
        );
        assert_eq!(
            root.find("Export/ExportConfiguration/ExportDirectory").unwrap().text(),
            "/exports"
        );
        assert_eq!(
            root.find("Export/CustodianDetails/Custodian")
                .unwrap()
                .attribute("failedItems"),
            Some("2")
        );
        assert_eq!(
            root.find("Export/ThroughputStatistics/NativeDocRate").unwrap().text(),
            "5.0"
        );
        assert_eq!(
            root.find("Export/MimeTypeStatistics/MimeTypes/MimeType")
                .unwrap()
                .attribute("count"),
            Some("50")
        );
    }

    #[test]
    fn test_configuration_fallbacks() {
        let mut bare = unit("Jones", 1, 0, 1);
        bare.configuration = Some(XmlElement::new("ExportConfiguration"));
        bare.version = None;
        bare.architecture = None;

        let mut summary = AggregateSummary::new(start(), "/exports", "Custodian");
        summary.fold(bare);

        let root = summary.to_xml(start());
        assert_eq!(root.attribute("version"), Some(UNKNOWN_VERSION));
        assert_eq!(root.attribute("architecture"), Some(std::env::consts::ARCH));
        assert_eq!(
            root.find("Export/ExportConfiguration/ExportDirectory").unwrap().text(),
            "/exports"
        );
    }

    #[test]
    fn test_write_creates_report() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut summary = AggregateSummary::new(start(), temp.path(), "Custodian");
        summary.fold(unit("Jones", 10, 0, 10));

        let path = summary.write(temp.path()).unwrap();
        assert_eq!(path, temp.path().join(REPORT_FILE_NAME));

        let xml = std::fs::read_to_string(&path).unwrap();
        let root = parse_document(&xml, "summary").unwrap();
        assert_eq!(root.name, "Nuix");
    }
}
