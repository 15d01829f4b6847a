//! MD5-based deduplication

use crate::adapters::traits::Deduplicator;
use crate::domain::Item;
use std::collections::HashSet;

/// Keeps the first item of every MD5 digest
///
/// Input order is preserved. Items without a digest cannot be compared and
/// are always kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Deduplicator;

impl Deduplicator for Md5Deduplicator {
    fn deduplicate(&self, items: Vec<Item>) -> Vec<Item> {
        let mut seen = HashSet::new();
        items
            .into_iter()
            .filter(|item| item.md5.is_empty() || seen.insert(item.md5.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemBuilder;

    fn item(guid: &str, md5: &str) -> Item {
        ItemBuilder::new()
            .guid(guid)
            .unwrap()
            .name(guid)
            .md5(md5)
            .build()
            .unwrap()
    }

    #[test]
    fn test_keeps_first_per_digest() {
        let items = vec![item("a", "1"), item("b", "2"), item("c", "1"), item("d", "3")];
        let guids: Vec<String> = Md5Deduplicator
            .deduplicate(items)
            .into_iter()
            .map(|i| i.guid.to_string())
            .collect();
        assert_eq!(guids, vec!["a", "b", "d"]);
    }

    #[test]
    fn test_items_without_digest_are_kept() {
        let items = vec![item("a", ""), item("b", ""), item("c", "1")];
        assert_eq!(Md5Deduplicator.deduplicate(items).len(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(Md5Deduplicator.deduplicate(Vec::new()).is_empty());
    }
}
