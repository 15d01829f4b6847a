//! Output naming
//!
//! Turns deduplicated items into export targets: sanitized file names,
//! synthesized extensions, and collision repair. All naming is settled
//! before the first byte is written, so the paths of one cluster batch are
//! pairwise distinct by construction.

use crate::domain::Item;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Characters replaced by `_` in addition to control characters (which include TAB)
const ILLEGAL_CHARS: [char; 13] = [
    '<', '>', ':', '"', '|', '?', '*', '[', ']', '(', ')', '\\', '/',
];

/// An item paired with its final output path
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTarget {
    /// Item to export
    pub item: Item,

    /// Absolute output path
    pub path: PathBuf,
}

/// Replaces characters that are illegal in file names with `_`
///
/// Idempotent, and the output never contains a control character or any of
/// `< > : " | ? * [ ] ( ) \ /`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() || ILLEGAL_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Candidate file name for an item
///
/// File data already carries its extension in its name; everything else gets
/// the resolved extension appended.
pub fn candidate_file_name(item: &Item) -> String {
    let name = sanitize(&item.name);
    if item.is_file_data {
        name
    } else {
        format!("{}.{}", name, item.resolved_extension())
    }
}

/// Byte offset where the extension of a file name starts
///
/// The extension runs from the last `.` to the end. A dot in first position
/// marks a hidden file, not an extension; without an extension the offset
/// is the end of the name.
pub fn extension_start(file_name: &str) -> usize {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => idx,
        _ => file_name.len(),
    }
}

/// Inserts `" (<tag>)"` immediately before the extension
///
/// ```
/// use cluster_export::core::export::naming::insert_before_extension;
///
/// assert_eq!(insert_before_extension("doc.pdf", "abc"), "doc (abc).pdf");
/// assert_eq!(insert_before_extension("README", "abc"), "README (abc)");
/// ```
pub fn insert_before_extension(file_name: &str, tag: &str) -> String {
    let (stem, ext) = file_name.split_at(extension_start(file_name));
    format!("{stem} ({tag}){ext}")
}

/// Plans the export targets of one cluster batch
///
/// Every item whose candidate name is shared with another item of the batch
/// gets its MD5 digest inserted before the extension. Items that still share
/// a path afterwards (same name and same digest) get their GUID inserted the
/// same way, and any that collide even then get their 1-based position in
/// the batch. Targets keep the order of `items`.
pub fn plan_targets(items: Vec<Item>, directory: &Path) -> Vec<ExportTarget> {
    let mut names: Vec<String> = items.iter().map(candidate_file_name).collect();

    let colliding = repeated(&names);
    if !colliding.is_empty() {
        tracing::info!(
            directory = %directory.display(),
            count = names.iter().filter(|n| colliding.contains_key(n.as_str())).count(),
            "Including MD5 for filename collisions"
        );
    }
    for (name, item) in names.iter_mut().zip(&items) {
        if colliding.contains_key(name.as_str()) {
            *name = insert_before_extension(name, &item.md5);
        }
    }

    let still_colliding = repeated(&names);
    if !still_colliding.is_empty() {
        tracing::warn!(
            directory = %directory.display(),
            count = still_colliding.len(),
            "Identical name and digest, including GUID"
        );
    }
    for (name, item) in names.iter_mut().zip(&items) {
        if still_colliding.contains_key(name.as_str()) {
            *name = insert_before_extension(name, &sanitize(item.guid.as_str()));
        }
    }

    // GUIDs can sanitize to the same tag; number whatever is left
    loop {
        let remaining = repeated(&names);
        if remaining.is_empty() {
            break;
        }
        tracing::warn!(
            directory = %directory.display(),
            count = remaining.len(),
            "Sanitized GUIDs collide, including position"
        );
        for (index, name) in names.iter_mut().enumerate() {
            if remaining.contains_key(name.as_str()) {
                *name = insert_before_extension(name, &(index + 1).to_string());
            }
        }
    }

    items
        .into_iter()
        .zip(names)
        .map(|(item, name)| ExportTarget {
            path: directory.join(name),
            item,
        })
        .collect()
}

/// Names that occur more than once, with their counts
fn repeated(names: &[String]) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for name in names {
        *counts.entry(name.clone()).or_default() += 1;
    }
    counts.retain(|_, count| *count > 1);
    counts
}
