//! Cluster and cluster run models

use super::ids::{ClusterId, ItemGuid};
use serde::{Deserialize, Serialize};

/// A group of items produced by a clustering run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Id, unique within the run
    pub id: ClusterId,

    /// Members of the cluster, in the order the run lists them
    #[serde(default)]
    pub items: Vec<ItemGuid>,
}

impl Cluster {
    /// Creates a cluster
    pub fn new(id: ClusterId, items: Vec<ItemGuid>) -> Self {
        Self { id, items }
    }

    /// Directory and report name of the cluster
    pub fn display_name(&self) -> String {
        self.id.display_name()
    }
}

/// A named clustering run within a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterRun {
    /// Run name as stored in the case
    pub name: String,

    /// Clusters of the run
    #[serde(default)]
    pub clusters: Vec<Cluster>,
}

impl ClusterRun {
    /// Finds a cluster by id
    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == id)
    }

    /// Clusters sorted by ascending id
    pub fn sorted_clusters(&self) -> Vec<&Cluster> {
        let mut clusters: Vec<&Cluster> = self.clusters.iter().collect();
        clusters.sort_by_key(|c| c.id);
        clusters
    }
}

/// Composite key `"<run>-<clusterName>"`
///
/// Identifies a cluster across runs. Used both as the manifest's
/// `Cluster ID` column and as the key of an item's cluster metadata.
pub fn cluster_key(run_name: &str, id: ClusterId) -> String {
    format!("{}-{}", run_name, id.display_name())
}
