use std::collections::BTreeMap;

use super::traits::Storage;
use crate::error::StorageResult;

/// NOT thread-safe
/// TODO: wrap in `Arc<RwLock<MemoryStorage>>` or use a concurrent implementation
///
/// Backed by a `BTreeMap` rather than a hash map so that iteration yields
/// keys in ascending lexicographic order — table scans and queries rely on
/// that ordering to produce stable, paginatable results.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    data: BTreeMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
        }
    }

    pub fn with_capacity(_capacity: usize) -> Self {
        Self::new()
    }

    pub fn clear(&mut self) {
        self.data.clear()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.data.keys().map(|s| s.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.data.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Iterates entries whose key is strictly greater than `after`, in
    /// ascending order. Used to resume a scan/query from a continuation key.
    pub fn iter_after<'a>(&'a self, after: &'a str) -> impl Iterator<Item = (&'a str, &'a [u8])> {
        self.data
            .range::<str, _>((
                std::ops::Bound::Excluded(after),
                std::ops::Bound::Unbounded,
            ))
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.data
            .keys()
            .filter(move |k| k.starts_with(prefix))
            .map(|s| s.as_str())
    }

    pub fn count_with_prefix(&self, prefix: &str) -> usize {
        self.keys_with_prefix(prefix).count()
    }

    // TODO: count bytes instead of values
    pub fn total_value_bytes(&self) -> usize {
        self.data.values().map(|v| v.len()).sum()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn put(&mut self, key: &str, value: Vec<u8>) -> StorageResult<()> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn delete(&mut self, key: &str) -> StorageResult<()> {
        self.data.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.data.contains_key(key))
    }

    fn len(&self) -> usize {
        self.data.len()
    }
}

impl IntoIterator for MemoryStorage {
    type Item = (String, Vec<u8>);
    type IntoIter = std::collections::btree_map::IntoIter<String, Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl FromIterator<(String, Vec<u8>)> for MemoryStorage {
    fn from_iter<T: IntoIterator<Item = (String, Vec<u8>)>>(iter: T) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_is_sorted() {
        let mut storage = MemoryStorage::new();
        storage.put("c", vec![3]).unwrap();
        storage.put("a", vec![1]).unwrap();
        storage.put("b", vec![2]).unwrap();

        let keys: Vec<&str> = storage.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn iter_after_resumes_past_a_key() {
        let mut storage = MemoryStorage::new();
        for k in ["a", "b", "c", "d"] {
            storage.put(k, vec![0]).unwrap();
        }

        let keys: Vec<&str> = storage.iter_after("b").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["c", "d"]);
    }
}
