//! Result type alias
//!
//! This module provides a convenient Result type alias that uses
//! `ClusterExportError` as the error type.

use super::errors::ClusterExportError;

/// Result type alias for library operations
///
/// # Examples
///
/// ```
/// use cluster_export::domain::result::Result;
/// use cluster_export::domain::errors::ClusterExportError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ClusterExportError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ClusterExportError>;
