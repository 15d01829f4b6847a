//! Filesystem collaborators
//!
//! [`FileCopyExporter`] writes an item's native bytes by copying its source
//! file; [`FsDirectories`] creates output directories.

use crate::adapters::traits::{BinaryExporter, DirectoryCreator, ExportFailure};
use crate::domain::{ClusterExportError, Item, Result};
use std::fs;
use std::path::Path;

/// Exports items by copying their on-disk source
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCopyExporter;

impl BinaryExporter for FileCopyExporter {
    fn export_item(&self, item: &Item, path: &Path) -> std::result::Result<(), ExportFailure> {
        let source = item.source_path.as_deref().ok_or_else(|| {
            ExportFailure::new(format!("Item {} has no binary source", item.guid))
        })?;

        fs::copy(source, path).map_err(|e| {
            ExportFailure::new(format!(
                "Failed to copy {} to {}: {}",
                source.display(),
                path.display(),
                e
            ))
        })?;

        tracing::trace!(item_guid = %item.guid, path = %path.display(), "Copied native");
        Ok(())
    }
}

/// Creates directories with `create_dir_all`
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDirectories;

impl DirectoryCreator for FsDirectories {
    fn create_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| {
            ClusterExportError::Filesystem(format!(
                "Failed to create directory {}: {}",
                path.display(),
                e
            ))
        })
    }
}
