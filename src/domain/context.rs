//! Error context extension trait
//!
//! This module provides a context extension trait similar to `anyhow::Context`
//! that works with `Result<T, ClusterExportError>`, so library code can add
//! context to errors while keeping the domain error type.
//!
//! # Examples
//!
//! ```rust
//! use cluster_export::domain::Result;
//! use cluster_export::domain::context::ResultExt;
//!
//! fn read_case(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read case file: {}", path))
//! }
//! ```

use crate::domain::errors::ClusterExportError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// The context is evaluated eagerly, so use `.with_context()` if the
    /// context string is expensive to compute.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation)
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ClusterExportError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f().to_string()))
    }
}

/// Prefixes the message while keeping the variant, so callers can still
/// tell a filesystem failure from a case failure after context is added.
fn wrap(error: ClusterExportError, context: String) -> ClusterExportError {
    match error {
        ClusterExportError::Configuration(m) => {
            ClusterExportError::Configuration(format!("{context}: {m}"))
        }
        ClusterExportError::Filesystem(m) => {
            ClusterExportError::Filesystem(format!("{context}: {m}"))
        }
        ClusterExportError::Case(m) => ClusterExportError::Case(format!("{context}: {m}")),
        other => ClusterExportError::Other(format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_context_keeps_variant() {
        let result: Result<()> = Err(ClusterExportError::Filesystem("denied".to_string()));
        let err = result.context("Failed to create cluster directory").unwrap_err();

        assert!(matches!(err, ClusterExportError::Filesystem(_)));
        assert!(err.to_string().contains("Failed to create cluster directory"));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let called = Arc::new(AtomicBool::new(false));
        let called_clone = called.clone();

        let result: Result<i32> = Ok(42);
        let with_context = result.with_context(|| {
            called_clone.store(true, Ordering::SeqCst);
            "Expensive context"
        });

        assert!(with_context.is_ok());
        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn test_io_error_with_context() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let result: std::result::Result<(), std::io::Error> = Err(io_error);
        let err = result.context("Failed to read case file 'case.json'").unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("Failed to read case file"));
        assert!(msg.contains("File not found"));
    }

    #[test]
    fn test_context_chaining() {
        let result: Result<()> = Err(ClusterExportError::Case("no such run".to_string()));
        let err = result
            .context("Failed to list clusters")
            .context("Export aborted")
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("Export aborted"));
        assert!(msg.contains("Failed to list clusters"));
        assert!(msg.contains("no such run"));
    }
}
