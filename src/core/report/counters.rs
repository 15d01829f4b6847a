//! Insertion-ordered counters

/// Named integer counters that remember first-insertion order
///
/// Merging adds values key by key; a key seen for the first time starts at
/// zero. Output order is the order in which keys were first seen, so merged
/// statistics keep the layout of the first report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterMap {
    entries: Vec<(String, i64)>,
}

impl CounterMap {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` to `key`
    pub fn add(&mut self, key: &str, value: i64) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, total)) => *total += value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Replaces the value of `key`, keeping its original position
    pub fn set(&mut self, key: &str, value: i64) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, current)) => *current = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Current value of `key`, zero when absent
    pub fn get(&self, key: &str) -> i64 {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }

    /// Adds every counter of `other`
    pub fn merge(&mut self, other: &CounterMap) {
        for (key, value) in other.iter() {
            self.add(key, value);
        }
    }

    /// Counters in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no key was ever added
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, i64)> for CounterMap {
    fn from_iter<T: IntoIterator<Item = (&'a str, i64)>>(iter: T) -> Self {
        let mut map = CounterMap::new();
        for (key, value) in iter {
            map.add(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_adds_and_keeps_order() {
        let mut total: CounterMap = [("b", 1), ("a", 2)].into_iter().collect();
        let other: CounterMap = [("a", 3), ("c", 4)].into_iter().collect();

        total.merge(&other);

        let entries: Vec<(&str, i64)> = total.iter().collect();
        assert_eq!(entries, vec![("b", 1), ("a", 5), ("c", 4)]);
        assert_eq!(total.get("missing"), 0);
        assert_eq!(total.len(), 3);
    }

    #[test]
    fn test_repeated_key_accumulates() {
        let mut map = CounterMap::new();
        assert!(map.is_empty());
        map.add("text/plain", 2);
        map.add("text/plain", 2);
        assert_eq!(map.get("text/plain"), 4);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut map: CounterMap = [("a", 1), ("b", 2)].into_iter().collect();
        map.set("a", 7);
        map.set("c", 3);

        let entries: Vec<(&str, i64)> = map.iter().collect();
        assert_eq!(entries, vec![("a", 7), ("b", 2), ("c", 3)]);
    }
}
