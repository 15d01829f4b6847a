//! Collaborator traits
//!
//! The export engine never talks to a case store or the filesystem directly.
//! It goes through these traits, which the adapters in this crate implement
//! for a file-backed case and which tests replace with in-memory doubles.

use crate::domain::{ClusterRun, Item, ItemGuid, Result};
use std::path::Path;
use thiserror::Error;

/// Failure raised by a [`BinaryExporter`] for a single item
///
/// Recoverable: the engine records the message and moves on to the next item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExportFailure {
    /// Human-readable reason, written to the errors report
    pub message: String,
}

impl ExportFailure {
    /// Creates a failure with a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Read-only access to the clusters and items of a case
pub trait CaseSource: Send + Sync {
    /// Names of the cluster runs in the case
    fn cluster_run_names(&self) -> Vec<String>;

    /// Loads a cluster run by exact name
    ///
    /// # Errors
    ///
    /// Returns an error if no run has that name.
    fn cluster_run(&self, name: &str) -> Result<ClusterRun>;

    /// Resolves item GUIDs to items, preserving order
    ///
    /// # Errors
    ///
    /// Returns an error if a GUID is not part of the case.
    fn items(&self, guids: &[ItemGuid]) -> Result<Vec<Item>>;
}

/// Reduces a collection of items to one representative per distinct content
pub trait Deduplicator: Send + Sync {
    /// Returns the distinct items; the selection policy belongs to the implementor
    fn deduplicate(&self, items: Vec<Item>) -> Vec<Item>;
}

/// Writes the native bytes of an item to disk
pub trait BinaryExporter: Send + Sync {
    /// Exports one item to an absolute path
    ///
    /// Atomic from the engine's point of view: it is never interrupted by
    /// cancellation.
    fn export_item(&self, item: &Item, path: &Path) -> std::result::Result<(), ExportFailure>;
}

/// Creates output directories
pub trait DirectoryCreator: Send + Sync {
    /// Creates a directory and its parents; succeeds if it already exists
    ///
    /// # Errors
    ///
    /// Failures are fatal to the run.
    fn create_all(&self, path: &Path) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_failure_display() {
        let failure = ExportFailure::new("source file missing");
        assert_eq!(failure.to_string(), "source file missing");
        assert_eq!(failure.message, "source file missing");
    }
}
