//! Local filesystem object store.
//!
//! ## Layout
//!
//! ```text
//! <root>/
//! ├── .meta/                       # Content-type sidecars (never served)
//! │   └── photos/
//! │       └── trips/cat_w100.webp.json
//! └── photos/                      # One directory per container
//!     └── trips/
//!         ├── cat.jpg
//!         └── cat_w100.webp
//! ```
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! concurrent reader sees either the old object or the new one, never a
//! partial file.

use super::{ObjectStore, StorageError};
use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

const META_DIR: &str = ".meta";

/// Sidecar written next to every object stored through [`FsStore::write`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct ObjectMeta {
    content_type: String,
}

#[derive(Debug)]
pub struct FsStore {
    root: PathBuf,
    tmp_counter: AtomicU64,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            tmp_counter: AtomicU64::new(0),
        }
    }

    /// Map `(container, name)` to a path under the root.
    ///
    /// Containers must be a single visible directory name. Names may nest but
    /// every component must be a plain file or directory name.
    fn object_path(&self, container: &str, name: &str) -> Result<PathBuf, StorageError> {
        if container.is_empty() || container.starts_with('.') || container.contains(['/', '\\'])
        {
            return Err(StorageError::InvalidKey(format!("container {container:?}")));
        }
        let relative = Path::new(name);
        let plain = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(StorageError::InvalidKey(format!("name {name:?}")));
        }
        Ok(self.root.join(container).join(relative))
    }

    fn meta_path(&self, container: &str, name: &str) -> PathBuf {
        self.root
            .join(META_DIR)
            .join(container)
            .join(format!("{name}.json"))
    }

    /// Content type recorded when the object was written, if any.
    pub async fn content_type(
        &self,
        container: &str,
        name: &str,
    ) -> Result<Option<String>, StorageError> {
        self.object_path(container, name)?;
        match tokio::fs::read(self.meta_path(container, name)).await {
            Ok(raw) => {
                let meta: ObjectMeta = serde_json::from_slice(&raw)?;
                Ok(Some(meta.content_type))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write `data` to `path` through a temporary sibling and a rename.
    async fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let seq = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_file_name(format!(".{file_name}.{}-{seq}.tmp", std::process::id()));

        tokio::fs::write(&tmp, data).await?;
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn exists(&self, container: &str, name: &str) -> Result<bool, StorageError> {
        let path = self.object_path(container, name)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn read(&self, container: &str, name: &str) -> Result<Bytes, StorageError> {
        let path = self.object_path(container, name)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::not_found(container, name))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write(
        &self,
        container: &str,
        name: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let path = self.object_path(container, name)?;
        let meta = serde_json::to_vec(&ObjectMeta {
            content_type: content_type.to_string(),
        })?;
        self.write_atomic(&path, &data).await?;
        self.write_atomic(&self.meta_path(container, name), &meta)
            .await
    }
}
