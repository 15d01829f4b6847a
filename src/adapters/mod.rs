//! External collaborators.
//!
//! The export engine depends on four collaborators, each behind a trait in
//! [`traits`]:
//!
//! - [`CaseSource`] - read-only enumeration of cluster runs, clusters and items
//! - [`Deduplicator`] - reduces items to one per distinct content
//! - [`BinaryExporter`] - writes an item's native bytes to a path
//! - [`DirectoryCreator`] - idempotent directory creation
//!
//! Concrete implementations for a file-backed case:
//!
//! - [`JsonCase`] - case described by a JSON document
//! - [`Md5Deduplicator`] - first item per MD5 digest wins
//! - [`FileCopyExporter`] - copies the item's source file
//! - [`FsDirectories`] - `std::fs::create_dir_all`

pub mod case_file;
pub mod dedupe;
pub mod filesystem;
pub mod traits;

pub use case_file::JsonCase;
pub use dedupe::Md5Deduplicator;
pub use filesystem::{FileCopyExporter, FsDirectories};
pub use traits::{BinaryExporter, CaseSource, Deduplicator, DirectoryCreator, ExportFailure};
