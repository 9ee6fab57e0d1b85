//! In-memory object store.
//!
//! Backs tests and ephemeral runs. Counts every call so tests can assert how
//! the resolver talked to storage.

use super::{ObjectStore, StorageError};
use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// An object as held by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<(String, String), StoredObject>>,
    exists_calls: AtomicUsize,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without counting it as a write.
    pub fn insert(&self, container: &str, name: &str, data: impl Into<Bytes>) {
        self.objects.write().insert(
            (container.to_string(), name.to_string()),
            StoredObject {
                data: data.into(),
                content_type: None,
            },
        );
    }

    pub fn get(&self, container: &str, name: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .get(&(container.to_string(), name.to_string()))
            .cloned()
    }

    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn exists(&self, container: &str, name: &str) -> Result<bool, StorageError> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .objects
            .read()
            .contains_key(&(container.to_string(), name.to_string())))
    }

    async fn read(&self, container: &str, name: &str) -> Result<Bytes, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.get(container, name)
            .map(|o| o.data)
            .ok_or_else(|| StorageError::not_found(container, name))
    }

    async fn write(
        &self,
        container: &str,
        name: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.objects.write().insert(
            (container.to_string(), name.to_string()),
            StoredObject {
                data,
                content_type: Some(content_type.to_string()),
            },
        );
        Ok(())
    }
}
