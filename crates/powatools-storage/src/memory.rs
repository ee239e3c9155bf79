//! In-process [`BlobStore`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::store::{BlobStore, Object, ObjectInfo};

type Buckets = HashMap<String, HashMap<String, Object>>;

/// Thread-safe in-memory bucket store.
///
/// Buckets must be created before use; operations on an unknown bucket fail
/// with [`StorageError::Backend`]. Clones share contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    buckets: Arc<RwLock<Buckets>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with the named buckets already created.
    pub fn with_buckets<I, B>(names: I) -> StorageResult<Self>
    where
        I: IntoIterator<Item = B>,
        B: Into<String>,
    {
        let store = Self::new();
        for name in names {
            store.create_bucket(name)?;
        }
        Ok(store)
    }

    /// Create an empty bucket. Creating an existing bucket is a no-op.
    pub fn create_bucket(&self, name: impl Into<String>) -> StorageResult<()> {
        let name = name.into();
        debug!(bucket = %name, "creating bucket");
        self.write()?.entry(name).or_default();
        Ok(())
    }

    /// Keys in `bucket`, sorted.
    pub fn list(&self, bucket: &str) -> StorageResult<Vec<String>> {
        let buckets = self.read()?;
        let objects = buckets.get(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        let mut keys: Vec<String> = objects.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn read(&self) -> StorageResult<std::sync::RwLockReadGuard<'_, Buckets>> {
        self.buckets
            .read()
            .map_err(|e| StorageError::Backend(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> StorageResult<std::sync::RwLockWriteGuard<'_, Buckets>> {
        self.buckets
            .write()
            .map_err(|e| StorageError::Backend(format!("lock poisoned: {}", e)))
    }
}

fn no_such_bucket(bucket: &str) -> StorageError {
    StorageError::Backend(format!("no such bucket: {}", bucket))
}

impl BlobStore for MemoryStore {
    fn head(&self, bucket: &str, key: &str) -> StorageResult<ObjectInfo> {
        let buckets = self.read()?;
        let objects = buckets.get(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        objects
            .get(key)
            .map(Object::info)
            .ok_or_else(|| StorageError::not_found(bucket, key))
    }

    fn get(&self, bucket: &str, key: &str) -> StorageResult<Object> {
        let buckets = self.read()?;
        let objects = buckets.get(bucket).ok_or_else(|| no_such_bucket(bucket))?;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::not_found(bucket, key))
    }

    fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        let mut buckets = self.write()?;
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;
        objects.insert(
            key.to_string(),
            Object {
                body,
                content_type: Some(content_type.to_string()),
            },
        );
        Ok(())
    }

    fn delete(&self, bucket: &str, key: &str) -> StorageResult<()> {
        let mut buckets = self.write()?;
        let objects = buckets
            .get_mut(bucket)
            .ok_or_else(|| no_such_bucket(bucket))?;
        objects.remove(key);
        Ok(())
    }
}
