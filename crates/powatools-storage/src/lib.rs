//! JSON documents in object storage.
//!
//! - [`BlobStore`]: the byte-level operations a bucket store provides
//! - [`JsonStore`]: typed JSON get/put on top of any [`BlobStore`]
//! - [`MemoryStore`]: an in-process [`BlobStore`] for tests and local runs
//!
//! Every call is a single attempt; nothing is retried.

mod error;
mod memory;
mod store;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use store::{BlobStore, JsonStore, Object, ObjectInfo, JSON_CONTENT_TYPE};
