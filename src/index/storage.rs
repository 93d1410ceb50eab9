use std::collections::HashMap;

#[derive(Debug)]
pub struct IndexStorage<V> {
    /// primary data store: index_storage_key -> value
    data: HashMap<String, V>,
    /// reverse index: table_storage_key -> index_storage_key
    reverse_index: HashMap<String, String>,
}

impl<V> IndexStorage<V> {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            reverse_index: HashMap::new(),
        }
    }

    pub fn put(&mut self, table_key: String, index_key: String, value: V) -> Option<V> {
        let old = self.remove_by_table_key(&table_key);

        self.reverse_index.insert(table_key, index_key.clone());
        self.data.insert(index_key, value);

        old
    }

    pub fn get(&self, index_key: &str) -> Option<&V> {
        self.data.get(index_key)
    }

    pub fn remove_by_table_key(&mut self, table_key: &str) -> Option<V> {
        if let Some(index_key) = self.reverse_index.remove(table_key) {
            self.data.remove(&index_key)
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.reverse_index.clear();
    }

    #[inline]
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.data.values()
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.data.iter()
    }

    #[cfg(test)]
    pub fn reverse_index_len(&self) -> usize {
        self.reverse_index.len()
    }
}

impl<V> Default for IndexStorage<V> {
    fn default() -> Self {
        Self::new()
    }
}
