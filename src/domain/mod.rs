//! Domain models and types.
//!
//! This module contains the core domain models, types, and business rules
//! shared by the export engine and the report aggregator.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ClusterId`], [`ItemGuid`])
//! - **Domain models** ([`Item`], [`Cluster`], [`ClusterRun`])
//! - **Error types** ([`ClusterExportError`], [`ReportError`])
//! - **Result type alias** ([`Result`])
//!
//! # Pseudo-clusters
//!
//! Clustering runs produce two pseudo-clusters with negative ids. They
//! render as names wherever a cluster id becomes a path segment:
//!
//! ```rust
//! use cluster_export::domain::{cluster_key, ClusterId};
//!
//! assert_eq!(cluster_key("Run1", ClusterId::new(-1)), "Run1-unclusterable");
//! ```
//!
//! # Builder Pattern
//!
//! ```rust
//! use cluster_export::domain::ItemBuilder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let item = ItemBuilder::new()
//!     .guid("0c5b1a3e")?
//!     .name("doc.pdf")
//!     .md5("d41d8cd98f00b204e9800998ecf8427e")
//!     .file_data(true)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod cluster;
pub mod context;
pub mod errors;
pub mod ids;
pub mod item;
pub mod result;

pub use cluster::{cluster_key, Cluster, ClusterRun};
pub use errors::{ClusterExportError, ReportError};
pub use ids::{ClusterId, ItemGuid};
pub use item::{ClusterMembership, Item, ItemBuilder, FALLBACK_EXTENSION};
pub use result::Result;
