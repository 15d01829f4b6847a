//! Manifest and errors CSV reports
//!
//! Both reports are appended one row per export attempt and flushed after
//! every row, so an interrupted or crashed run still leaves truthful partial
//! logs behind. The writers flush again when dropped.

use crate::core::export::engine::ExportAttempt;
use crate::domain::{ClusterExportError, Item, ItemGuid, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Manifest header, in column order
pub const MANIFEST_HEADER: [&str; 9] = [
    "Item GUID",
    "Item Name",
    "Cluster ID",
    "Cluster Thread",
    "Cluster Endpoint Status",
    "MD5 Digest",
    "Original Path",
    "Tags",
    "Export Path",
];

/// Errors report header
pub const ERRORS_HEADER: [&str; 2] = ["Item GUID", "Error Message"];

/// Export path written for failed attempts
pub const ERROR_PATH: &str = "ERROR";

/// Separator between tag values
pub const TAG_SEPARATOR: &str = "; ";

/// Default manifest file name
pub const DEFAULT_MANIFEST_FILE_NAME: &str = "cluster-export.csv";

/// Default errors report file name
pub const DEFAULT_ERRORS_FILE_NAME: &str = "cluster-export-errors.csv";

fn create_csv(path: &Path, header: &[&str]) -> Result<csv::Writer<File>> {
    let file = File::create(path).map_err(|e| {
        ClusterExportError::Filesystem(format!("Failed to create {}: {}", path.display(), e))
    })?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(header)?;
    writer.flush()?;
    Ok(writer)
}

/// Per-run manifest: one row per export attempt
pub struct ManifestWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows: usize,
}

impl ManifestWriter {
    /// Creates the manifest and writes its header
    ///
    /// # Errors
    ///
    /// Returns a filesystem error if the file cannot be created.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let writer = create_csv(&path, &MANIFEST_HEADER)?;
        tracing::debug!(path = %path.display(), "Manifest created");
        Ok(Self {
            writer,
            path,
            rows: 0,
        })
    }

    /// Appends and flushes the row for one attempt
    pub fn append(&mut self, item: &Item, cluster_key: &str, attempt: &ExportAttempt) -> Result<()> {
        let membership = item.membership(cluster_key);
        let thread = membership
            .and_then(|m| m.thread_index)
            .map(|t| t.to_string())
            .unwrap_or_default();
        let endpoint = membership
            .and_then(|m| m.endpoint_status.clone())
            .unwrap_or_default();
        let export_path = match attempt {
            ExportAttempt::Exported(path) => path.display().to_string(),
            ExportAttempt::Failed(_) => ERROR_PATH.to_string(),
        };

        self.writer.write_record([
            item.guid.as_str(),
            item.name.as_str(),
            cluster_key,
            thread.as_str(),
            endpoint.as_str(),
            item.md5.as_str(),
            item.original_path.as_str(),
            item.tags.join(TAG_SEPARATOR).as_str(),
            export_path.as_str(),
        ])?;
        self.writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far, excluding the header
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes and closes the manifest
    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        Ok(self.path)
    }
}

/// Errors report, created on the first failure only
pub struct ErrorReport {
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
    rows: usize,
}

impl ErrorReport {
    /// Prepares an errors report; nothing is written until [`ErrorReport::append`]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
            rows: 0,
        }
    }

    /// Appends and flushes one failure, creating the file on first use
    pub fn append(&mut self, guid: &ItemGuid, message: &str) -> Result<()> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => {
                tracing::debug!(path = %self.path.display(), "Errors report created");
                create_csv(&self.path, &ERRORS_HEADER)?
            }
        };
        let writer = self.writer.insert(writer);
        writer.write_record([guid.as_str(), message])?;
        writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Failures written so far
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flushes and closes the report; returns its path if anything was written
    pub fn finish(mut self) -> Result<Option<PathBuf>> {
        match self.writer.as_mut() {
            Some(writer) => {
                writer.flush()?;
                Ok(Some(self.path))
            }
            None => Ok(None),
        }
    }
}
