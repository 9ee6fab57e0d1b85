//! Variant resolution and lazy materialization.
//!
//! Given a parsed [`RequestTarget`], [`resolve`] either returns the cached
//! variant bytes as stored, or derives the variant from its base image:
//!
//! ```text
//! exists(container, variant)?
//! ├── yes → read(variant)                       → bytes, is_new = false
//! └── no  → base = strip_dimension_tokens(variant)
//!           ├── base == variant → SourceNotFound
//!           └── read(base) → materialize(dims)  → bytes, is_new = true
//! ```
//!
//! The fallback is purely syntactic: the base name is computed from the
//! variant name, never looked up. The single existence check is trusted for
//! the rest of the request. Persisting a new variant is the caller's job
//! (see [`crate::server`]) so that it can happen after the response.

use crate::imaging::{self, BackendError, ImageBackend, Limits};
use crate::naming::{RequestTarget, strip_dimension_tokens};
use crate::storage::{ObjectStore, StorageError};
use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum VariantError {
    #[error("Both bucket and file parameters are required.")]
    InvalidRequest,
    #[error("File name not found: {variant}")]
    SourceNotFound { variant: String },
    #[error("Storage failed: {0}")]
    Storage(#[from] StorageError),
    #[error("Image processing failed: {0}")]
    Processing(#[from] BackendError),
}

/// Output of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Bytes to send to the client.
    pub bytes: Bytes,
    /// The variant was absent and has just been derived; it should be
    /// written back under its own name.
    pub is_new: bool,
}

/// Resolve `target` to output bytes, deriving the variant on a miss.
///
/// Materialization runs on the blocking pool since decoding and encoding
/// are CPU-bound.
pub async fn resolve(
    store: &dyn ObjectStore,
    backend: &Arc<dyn ImageBackend>,
    target: &RequestTarget,
    limits: Limits,
) -> Result<Resolved, VariantError> {
    if !target.is_complete() {
        return Err(VariantError::InvalidRequest);
    }
    let RequestTarget {
        container,
        variant,
        dimensions,
    } = target;

    let is_new = !store.exists(container, variant).await?;
    info!(container = %container, variant = %variant, is_new, "existence checked");

    if !is_new {
        let bytes = store.read(container, variant).await?;
        debug!(bytes = bytes.len(), "serving cached variant");
        return Ok(Resolved { bytes, is_new });
    }

    let base = strip_dimension_tokens(variant);
    if &base == variant {
        return Err(VariantError::SourceNotFound {
            variant: variant.clone(),
        });
    }

    let source = store.read(container, &base).await?;
    debug!(base = %base, bytes = source.len(), "base image read");

    let backend = Arc::clone(backend);
    let dimensions = *dimensions;
    let output = tokio::task::spawn_blocking(move || {
        imaging::materialize(backend.as_ref(), &source, dimensions, &limits)
    })
    .await
    .map_err(|e| BackendError::ProcessingFailed(format!("Processing task failed: {e}")))??;

    info!(container = %container, variant = %variant, bytes = output.len(), "variant derived");
    Ok(Resolved {
        bytes: Bytes::from(output),
        is_new,
    })
}
