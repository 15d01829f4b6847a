//! Item domain model
//!
//! An item is one content unit of a case: an email, an attachment, a loose
//! file. Only the metadata the cluster export needs is modelled here.

use super::ids::ItemGuid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Extension used when no stage of the resolution chain yields one
pub const FALLBACK_EXTENSION: &str = "BIN";

/// Per-cluster metadata of an item
///
/// Keyed on the item by the composite `"<run>-<clusterName>"` string, see
/// [`crate::domain::cluster::cluster_key`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterMembership {
    /// Position of the item within its cluster thread
    #[serde(default)]
    pub thread_index: Option<i64>,

    /// Endpoint status reported by the clustering run (e.g. "unique", "inclusive")
    #[serde(default)]
    pub endpoint_status: Option<String>,
}

/// A case item
///
/// # Examples
///
/// ```
/// use cluster_export::domain::item::ItemBuilder;
///
/// let item = ItemBuilder::new()
///     .guid("4a1f")
///     .unwrap()
///     .name("Quarterly report")
///     .md5("9e107d9d372bb6826bd81d3542a419d6")
///     .corrected_extension("docx")
///     .build()
///     .unwrap();
///
/// assert_eq!(item.resolved_extension(), "docx");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Globally unique identifier
    pub guid: ItemGuid,

    /// Localised display name
    pub name: String,

    /// MD5 digest as lowercase hex
    pub md5: String,

    /// Tag values
    pub tags: Vec<String>,

    /// True when the item is raw file data whose name already carries an extension
    pub is_file_data: bool,

    /// Extension as found on the original item
    pub original_extension: Option<String>,

    /// Extension corrected by type detection
    pub corrected_extension: Option<String>,

    /// Preferred extension for the detected type
    pub type_preferred_extension: Option<String>,

    /// Path of the item within the case (e.g. "evidence/mailbox.pst/Inbox/msg")
    pub original_path: String,

    /// Where the item's bytes can be read from, when the case stores them on disk
    pub source_path: Option<PathBuf>,

    /// Cluster metadata keyed by `"<run>-<clusterName>"`
    pub cluster_memberships: HashMap<String, ClusterMembership>,
}

impl Item {
    /// Creates a new builder
    pub fn builder() -> ItemBuilder {
        ItemBuilder::default()
    }

    /// Resolves the extension for a synthesized file name
    ///
    /// Tries the original, corrected and type-preferred extensions in turn,
    /// skipping blank values, and falls back to [`FALLBACK_EXTENSION`].
    pub fn resolved_extension(&self) -> &str {
        [
            &self.original_extension,
            &self.corrected_extension,
            &self.type_preferred_extension,
        ]
        .into_iter()
        .flatten()
        .map(|ext| ext.as_str())
        .find(|ext| !ext.trim().is_empty())
        .unwrap_or(FALLBACK_EXTENSION)
    }

    /// Cluster metadata for a composite cluster key
    pub fn membership(&self, cluster_key: &str) -> Option<&ClusterMembership> {
        self.cluster_memberships.get(cluster_key)
    }
}

/// Builder for constructing Item instances
#[derive(Debug, Default)]
pub struct ItemBuilder {
    guid: Option<ItemGuid>,
    name: Option<String>,
    md5: Option<String>,
    tags: Vec<String>,
    is_file_data: bool,
    original_extension: Option<String>,
    corrected_extension: Option<String>,
    type_preferred_extension: Option<String>,
    original_path: Option<String>,
    source_path: Option<PathBuf>,
    cluster_memberships: HashMap<String, ClusterMembership>,
}

impl ItemBuilder {
    /// Creates a new ItemBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the GUID
    pub fn guid(mut self, guid: impl Into<String>) -> Result<Self, String> {
        self.guid = Some(ItemGuid::new(guid)?);
        Ok(self)
    }

    /// Sets the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the MD5 digest
    pub fn md5(mut self, md5: impl Into<String>) -> Self {
        self.md5 = Some(md5.into());
        self
    }

    /// Adds a tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Marks the item as raw file data
    pub fn file_data(mut self, is_file_data: bool) -> Self {
        self.is_file_data = is_file_data;
        self
    }

    /// Sets the original extension
    pub fn original_extension(mut self, ext: impl Into<String>) -> Self {
        self.original_extension = Some(ext.into());
        self
    }

    /// Sets the corrected extension
    pub fn corrected_extension(mut self, ext: impl Into<String>) -> Self {
        self.corrected_extension = Some(ext.into());
        self
    }

    /// Sets the type-preferred extension
    pub fn type_preferred_extension(mut self, ext: impl Into<String>) -> Self {
        self.type_preferred_extension = Some(ext.into());
        self
    }

    /// Sets the path within the case
    pub fn original_path(mut self, path: impl Into<String>) -> Self {
        self.original_path = Some(path.into());
        self
    }

    /// Sets the on-disk source of the item's bytes
    pub fn source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Adds cluster metadata under a composite cluster key
    pub fn membership(mut self, cluster_key: impl Into<String>, membership: ClusterMembership) -> Self {
        self.cluster_memberships.insert(cluster_key.into(), membership);
        self
    }

    /// Builds the Item
    ///
    /// # Errors
    ///
    /// Returns an error if the GUID or name is missing
    pub fn build(self) -> Result<Item, String> {
        Ok(Item {
            guid: self.guid.ok_or("guid is required")?,
            name: self.name.ok_or("name is required")?,
            md5: self.md5.unwrap_or_default(),
            tags: self.tags,
            is_file_data: self.is_file_data,
            original_extension: self.original_extension,
            corrected_extension: self.corrected_extension,
            type_preferred_extension: self.type_preferred_extension,
            original_path: self.original_path.unwrap_or_default(),
            source_path: self.source_path,
            cluster_memberships: self.cluster_memberships,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ItemBuilder {
        ItemBuilder::new().guid("g-1").unwrap().name("item")
    }

    #[test]
    fn test_extension_prefers_original() {
        let item = base()
            .original_extension("eml")
            .corrected_extension("msg")
            .type_preferred_extension("txt")
            .build()
            .unwrap();
        assert_eq!(item.resolved_extension(), "eml");
    }

    #[test]
    fn test_extension_skips_blank_stages() {
        let item = base()
            .original_extension("  ")
            .corrected_extension("")
            .type_preferred_extension("pdf")
            .build()
            .unwrap();
        assert_eq!(item.resolved_extension(), "pdf");
    }

    #[test]
    fn test_extension_falls_back_to_bin() {
        let item = base().build().unwrap();
        assert_eq!(item.resolved_extension(), "BIN");

        let blank = base()
            .original_extension(" ")
            .corrected_extension("\t")
            .type_preferred_extension("")
            .build()
            .unwrap();
        assert_eq!(blank.resolved_extension(), FALLBACK_EXTENSION);
    }

    #[test]
    fn test_membership_lookup() {
        let item = base()
            .membership(
                "Run1-3",
                ClusterMembership {
                    thread_index: Some(2),
                    endpoint_status: Some("inclusive".to_string()),
                },
            )
            .build()
            .unwrap();

        assert_eq!(item.membership("Run1-3").unwrap().thread_index, Some(2));
        assert!(item.membership("Run1-4").is_none());
    }

    #[test]
    fn test_builder_requires_name() {
        let result = ItemBuilder::new().guid("g-1").unwrap().build();
        assert!(result.is_err());
    }
}
