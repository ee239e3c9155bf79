//! Byte-level store trait and the typed JSON layer over it.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};

/// Content type written by [`JsonStore::put_json`].
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Metadata returned by [`BlobStore::head`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub content_length: usize,
    pub content_type: Option<String>,
}

/// A stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

impl Object {
    pub fn info(&self) -> ObjectInfo {
        ObjectInfo {
            content_length: self.body.len(),
            content_type: self.content_type.clone(),
        }
    }
}

/// Bucket/key object storage.
///
/// Implementations make exactly one attempt per call.
pub trait BlobStore: Send + Sync {
    /// Metadata for `bucket/key`. Fails with [`StorageError::NotFound`] when
    /// the object does not exist.
    fn head(&self, bucket: &str, key: &str) -> StorageResult<ObjectInfo>;

    /// Fetch `bucket/key`.
    fn get(&self, bucket: &str, key: &str) -> StorageResult<Object>;

    /// Create or replace `bucket/key`.
    fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Remove `bucket/key`. Removing a missing object succeeds.
    fn delete(&self, bucket: &str, key: &str) -> StorageResult<()>;
}

/// JSON documents on top of a [`BlobStore`].
#[derive(Debug, Clone)]
pub struct JsonStore<S> {
    store: S,
}

impl<S: BlobStore> JsonStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Whether `bucket/key` exists.
    ///
    /// Any failure to read metadata, including backend errors, counts as
    /// absent.
    pub fn exists(&self, bucket: &str, key: &str) -> bool {
        match self.store.head(bucket, key) {
            Ok(_) => true,
            Err(StorageError::NotFound { .. }) => false,
            Err(e) => {
                warn!(bucket, key, error = %e, "head failed; treating object as absent");
                false
            }
        }
    }

    /// Fetch and parse a JSON document.
    pub fn get_json<T: DeserializeOwned>(&self, bucket: &str, key: &str) -> StorageResult<T> {
        let object = self.store.get(bucket, key)?;
        serde_json::from_slice(&object.body).map_err(|source| StorageError::Json {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source,
        })
    }

    /// Serialize `value` and store it with content type `application/json`.
    pub fn put_json<T: Serialize + ?Sized>(
        &self,
        bucket: &str,
        key: &str,
        value: &T,
    ) -> StorageResult<()> {
        let body = serde_json::to_vec(value).map_err(|source| StorageError::Json {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source,
        })?;
        debug!(bucket, key, bytes = body.len(), "putting JSON object");
        self.store.put(bucket, key, body, JSON_CONTENT_TYPE)
    }

    /// Delete `bucket/key`.
    pub fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        debug!(bucket, key, "deleting object");
        self.store.delete(bucket, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Store whose every call fails at the backend.
    struct Unreachable;

    impl BlobStore for Unreachable {
        fn head(&self, _bucket: &str, _key: &str) -> StorageResult<ObjectInfo> {
            Err(StorageError::Backend("connection refused".into()))
        }

        fn get(&self, _bucket: &str, _key: &str) -> StorageResult<Object> {
            Err(StorageError::Backend("connection refused".into()))
        }

        fn put(
            &self,
            _bucket: &str,
            _key: &str,
            _body: Vec<u8>,
            _content_type: &str,
        ) -> StorageResult<()> {
            Err(StorageError::Backend("connection refused".into()))
        }

        fn delete(&self, _bucket: &str, _key: &str) -> StorageResult<()> {
            Err(StorageError::Backend("connection refused".into()))
        }
    }

    #[test]
    fn backend_failure_reads_as_absent() {
        assert!(!JsonStore::new(Unreachable).exists("b", "k"));
    }

    #[test]
    fn backend_failure_propagates_from_get() {
        let err = JsonStore::new(Unreachable)
            .get_json::<serde_json::Value>("b", "k")
            .unwrap_err();
        assert!(matches!(err, StorageError::Backend(_)));
    }

    #[test]
    fn object_info_reports_length() {
        let object = Object {
            body: b"{}".to_vec(),
            content_type: Some(JSON_CONTENT_TYPE.to_string()),
        };
        assert_eq!(object.info().content_length, 2);
    }
}
