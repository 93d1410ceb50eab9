use crate::error::{StorageError, StorageResult};

pub trait Storage {
    fn put(&mut self, key: &str, value: Vec<u8>) -> StorageResult<()>;

    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    fn delete(&mut self, key: &str) -> StorageResult<()>;

    fn exists(&self, key: &str) -> StorageResult<bool>;

    // TODO: scan/paginate for total item count?
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait StorageExt: Storage {
    fn put_if_not_exists(&mut self, key: &str, value: Vec<u8>) -> StorageResult<()>;

    fn get_or_error(&self, key: &str) -> StorageResult<Vec<u8>>;

    fn update(&mut self, key: &str, value: Vec<u8>) -> StorageResult<()>;

    // TODO: batch operations
    fn get_many(&self, keys: &[&str]) -> StorageResult<Vec<Option<Vec<u8>>>>;

    fn delete_and_get_old(&mut self, key: &str) -> StorageResult<Option<Vec<u8>>>;
}

impl<T: Storage> StorageExt for T {
    fn put_if_not_exists(&mut self, key: &str, value: Vec<u8>) -> StorageResult<()> {
        if self.exists(key)? {
            return Err(StorageError::already_exists(key));
        }
        self.put(key, value)
    }

    fn get_or_error(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.get(key)?.ok_or_else(|| StorageError::not_found(key))
    }

    fn update(&mut self, key: &str, value: Vec<u8>) -> StorageResult<()> {
        if !self.exists(key)? {
            return Err(StorageError::not_found(key));
        }
        self.put(key, value)
    }

    // TODO: batch operations
    fn get_many(&self, keys: &[&str]) -> StorageResult<Vec<Option<Vec<u8>>>> {
        keys.iter().map(|k| self.get(k)).collect()
    }

    fn delete_and_get_old(&mut self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let value = self.get(key)?;
        self.delete(key)?;
        Ok(value)
    }
}
