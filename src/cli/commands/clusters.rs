//! Clusters command implementation
//!
//! This module implements the `clusters` command, which lists the cluster
//! runs of a case or the clusters of one run with their item counts.

use super::load_or_report;
use crate::adapters::{CaseSource, Deduplicator, JsonCase, Md5Deduplicator};
use crate::domain::{ClusterRun, Result};
use clap::Args;

/// Arguments for the clusters command
#[derive(Args, Debug)]
pub struct ClustersArgs {
    /// Cluster run to list (defaults to export.cluster_run)
    #[arg(long = "run", value_name = "NAME")]
    pub cluster_run: Option<String>,

    /// Override case file
    #[arg(long)]
    pub case: Option<String>,
}

/// One row of the cluster table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterRow {
    pub cluster_run: String,
    pub id: String,
    pub items: usize,
    pub deduplicated: usize,
}

impl ClustersArgs {
    /// Execute the clusters command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let Some(mut config) = load_or_report(config_path) else {
            return Ok(2);
        };

        if let Some(case) = &self.case {
            config.case.path = case.clone();
        }
        if let Some(run) = &self.cluster_run {
            config.export.cluster_run = run.clone();
        }

        let case = match JsonCase::open(&config.case.path) {
            Ok(case) => case,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to open case");
                eprintln!("Failed to open case {}: {e}", config.case.path);
                return Ok(5);
            }
        };

        let run_name = config.export.cluster_run.trim();
        if run_name.is_empty() {
            println!("Cluster runs in {}:", case.name());
            for name in case.cluster_run_names() {
                println!("  {name}");
            }
            return Ok(0);
        }

        let run = match case.cluster_run(&config.export.cluster_run) {
            Ok(run) => run,
            Err(e) => {
                eprintln!("{e}");
                return Ok(2);
            }
        };

        let rows = match cluster_rows(&case, &run, &Md5Deduplicator) {
            Ok(rows) => rows,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to read cluster items");
                eprintln!("Failed to read cluster items: {e}");
                return Ok(5);
            }
        };

        println!(
            "{:<20} {:>14} {:>10} {:>20}",
            "Cluster Run", "ID", "Items", "Deduplicated Items"
        );
        for row in rows {
            println!(
                "{:<20} {:>14} {:>10} {:>20}",
                row.cluster_run, row.id, row.items, row.deduplicated
            );
        }
        Ok(0)
    }
}

/// Table rows for every cluster of `run`, sorted by id
pub fn cluster_rows(
    case: &dyn CaseSource,
    run: &ClusterRun,
    deduplicator: &dyn Deduplicator,
) -> Result<Vec<ClusterRow>> {
    run.sorted_clusters()
        .into_iter()
        .map(|cluster| {
            let items = case.items(&cluster.items)?;
            let total = items.len();
            Ok(ClusterRow {
                cluster_run: run.name.clone(),
                id: cluster.display_name(),
                items: total,
                deduplicated: deduplicator.deduplicate(items).len(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_cluster_rows() {
        let json = r#"{
            "name": "Case",
            "cluster_runs": [{
                "name": "Run1",
                "clusters": [
                    {"id": 4, "items": ["a", "b", "c"]},
                    {"id": -1, "items": ["c"]}
                ]
            }],
            "items": [
                {"guid": "a", "name": "a.txt", "md5": "m1", "is_file_data": true, "original_path": "a.txt"},
                {"guid": "b", "name": "b.txt", "md5": "m1", "is_file_data": true, "original_path": "b.txt"},
                {"guid": "c", "name": "c.txt", "md5": "m2", "is_file_data": true, "original_path": "c.txt"}
            ]
        }"#;
        let case = JsonCase::from_json(json, Path::new("/case")).unwrap();
        let run = case.cluster_run("Run1").unwrap();

        let rows = cluster_rows(&case, &run, &Md5Deduplicator).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, "unclusterable");
        assert_eq!((rows[0].items, rows[0].deduplicated), (1, 1));
        assert_eq!(rows[1].id, "4");
        assert_eq!((rows[1].items, rows[1].deduplicated), (3, 2));
    }
}
