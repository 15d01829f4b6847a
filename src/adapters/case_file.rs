//! File-backed case
//!
//! Reads a case description from a JSON document. Item bytes live next to
//! the document; `source_path` entries are resolved relative to it.
//!
//! ```json
//! {
//!   "name": "Matter 42",
//!   "cluster_runs": [
//!     { "name": "Run1", "clusters": [ { "id": -1, "items": ["g-1", "g-2"] } ] }
//!   ],
//!   "items": [
//!     {
//!       "guid": "g-1",
//!       "name": "doc.pdf",
//!       "is_file_data": true,
//!       "original_path": "Evidence/share/doc.pdf",
//!       "source_path": "natives/doc.pdf",
//!       "tags": ["Responsive"],
//!       "cluster_memberships": {
//!         "Run1-unclusterable": { "thread_index": 0, "endpoint_status": "unique" }
//!       }
//!     }
//!   ]
//! }
//! ```

use crate::adapters::traits::CaseSource;
use crate::domain::context::ResultExt;
use crate::domain::{ClusterExportError, ClusterMembership, ClusterRun, Item, ItemGuid, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CaseDocument {
    name: String,
    #[serde(default)]
    cluster_runs: Vec<ClusterRun>,
    #[serde(default)]
    items: Vec<ItemRecord>,
}

#[derive(Debug, Deserialize)]
struct ItemRecord {
    guid: ItemGuid,
    name: String,
    #[serde(default)]
    md5: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    is_file_data: bool,
    #[serde(default)]
    original_extension: Option<String>,
    #[serde(default)]
    corrected_extension: Option<String>,
    #[serde(default)]
    type_preferred_extension: Option<String>,
    #[serde(default)]
    original_path: String,
    #[serde(default)]
    source_path: Option<PathBuf>,
    #[serde(default)]
    cluster_memberships: HashMap<String, ClusterMembership>,
}

/// Case loaded from a JSON document
#[derive(Debug, Clone)]
pub struct JsonCase {
    name: String,
    runs: Vec<ClusterRun>,
    items: HashMap<ItemGuid, Item>,
}

impl JsonCase {
    /// Loads a case file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid case document.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read case file {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_json(&contents, base_dir)
            .with_context(|| format!("Failed to load case file {}", path.display()))
    }

    /// Parses a case document, resolving relative source paths against `base_dir`
    pub fn from_json(json: &str, base_dir: &Path) -> Result<Self> {
        let document: CaseDocument = serde_json::from_str(json)?;

        let mut items = HashMap::with_capacity(document.items.len());
        for record in document.items {
            let item = into_item(record, base_dir);
            let guid = item.guid.clone();
            if items.insert(guid.clone(), item).is_some() {
                return Err(ClusterExportError::Case(format!(
                    "Duplicate item GUID {guid} in case file"
                )));
            }
        }

        tracing::debug!(
            case = %document.name,
            runs = document.cluster_runs.len(),
            items = items.len(),
            "Loaded case"
        );

        Ok(Self {
            name: document.name,
            runs: document.cluster_runs,
            items,
        })
    }

    /// Case name
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn into_item(record: ItemRecord, base_dir: &Path) -> Item {
    let source_path = record.source_path.map(|p| {
        if p.is_absolute() {
            p
        } else {
            base_dir.join(p)
        }
    });

    let md5 = match record.md5.filter(|d| !d.trim().is_empty()) {
        Some(digest) => digest.to_lowercase(),
        None => digest_of(source_path.as_deref()).unwrap_or_else(|| {
            tracing::warn!(item_guid = %record.guid, "Item has no MD5 digest");
            String::new()
        }),
    };

    Item {
        guid: record.guid,
        name: record.name,
        md5,
        tags: record.tags,
        is_file_data: record.is_file_data,
        original_extension: record.original_extension,
        corrected_extension: record.corrected_extension,
        type_preferred_extension: record.type_preferred_extension,
        original_path: record.original_path,
        source_path,
        cluster_memberships: record.cluster_memberships,
    }
}

fn digest_of(path: Option<&Path>) -> Option<String> {
    let bytes = fs::read(path?).ok()?;
    Some(format!("{:x}", md5::compute(bytes)))
}

impl CaseSource for JsonCase {
    fn cluster_run_names(&self) -> Vec<String> {
        self.runs.iter().map(|r| r.name.clone()).collect()
    }

    fn cluster_run(&self, name: &str) -> Result<ClusterRun> {
        self.runs
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| ClusterExportError::Case(format!("No cluster run named '{name}'")))
    }

    fn items(&self, guids: &[ItemGuid]) -> Result<Vec<Item>> {
        guids
            .iter()
            .map(|guid| {
                self.items.get(guid).cloned().ok_or_else(|| {
                    ClusterExportError::Case(format!("Cluster references unknown item {guid}"))
                })
            })
            .collect()
    }
}
