//! Object storage seam.
//!
//! The resolver only ever needs three calls against the store: an existence
//! check, a read, and a write tagged with a content type. [`ObjectStore`]
//! captures exactly that, so the request path can run against local disk
//! ([`FsStore`]) or an in-memory map ([`MemoryStore`]) without change.
//!
//! Objects are addressed by `(container, name)`. Names may contain `/` to
//! express folder-like nesting. Writes are last-writer-wins per name.

mod fs;
mod memory;

pub use fs::FsStore;
pub use memory::{MemoryStore, StoredObject};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Object not found: {container}/{name}")]
    NotFound { container: String, name: String },
    #[error("Invalid object key: {0}")]
    InvalidKey(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl StorageError {
    pub fn not_found(container: &str, name: &str) -> Self {
        Self::NotFound {
            container: container.to_string(),
            name: name.to_string(),
        }
    }
}

/// Storage capability injected into the request path.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whether an object named `name` exists in `container`.
    async fn exists(&self, container: &str, name: &str) -> Result<bool, StorageError>;

    /// Read the full contents of an object.
    async fn read(&self, container: &str, name: &str) -> Result<Bytes, StorageError>;

    /// Create or overwrite an object.
    async fn write(
        &self,
        container: &str,
        name: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;
}
