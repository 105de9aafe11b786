//! Persistence of the encoded canvas image under one well-known key.

use crate::storage::{Storage, StorageError, StorageResult};
use std::sync::Arc;

/// Key the encoded canvas is stored under.
pub const CANVAS_STATE_KEY: &str = "canvasState";

/// Reads and writes the encoded canvas through a storage backend.
pub struct CanvasStore<S: Storage> {
    /// Storage backend.
    storage: Arc<S>,
    key: String,
}

impl<S: Storage> CanvasStore<S> {
    /// Create a store writing to [`CANVAS_STATE_KEY`].
    pub fn new(storage: Arc<S>) -> Self {
        Self::with_key(storage, CANVAS_STATE_KEY)
    }

    /// Create a store writing to a custom key.
    pub fn with_key(storage: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Load the stored canvas, `None` if nothing was saved yet.
    pub fn load(&self) -> StorageResult<Option<String>> {
        match self.storage.get(&self.key) {
            Ok(value) if value.is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Save the encoded canvas, overwriting the previous value.
    pub fn save(&self, encoded: &str) -> StorageResult<()> {
        self.storage.set(&self.key, encoded)?;
        log::debug!("Saved canvas to '{}' ({} bytes)", self.key, encoded.len());
        Ok(())
    }
}
