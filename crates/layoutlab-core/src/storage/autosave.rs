//! Coalesced persistence of the scene.
//!
//! Mutations only call [`AutoSave::request`]. The host's animation-frame
//! tick then writes at most one snapshot, so a burst of changes within one
//! frame costs a single write.

use super::{Storage, StorageError, StorageResult};

pub struct AutoSave {
    storage: Box<dyn Storage>,
    key: String,
    dirty: bool,
    saves: usize,
}

impl AutoSave {
    pub fn new(storage: Box<dyn Storage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            dirty: false,
            saves: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Mark the scene as changed since the last write.
    pub fn request(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of writes performed.
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Write `payload` if a save was requested. Returns whether a write
    /// happened. A failed write is not retried until the next request.
    pub fn tick(&mut self, payload: impl FnOnce() -> StorageResult<String>) -> StorageResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.dirty = false;
        let json = payload()?;
        self.storage.set(&self.key, &json)?;
        self.saves += 1;
        log::debug!("Saved layout to {} ({} bytes)", self.key, json.len());
        Ok(true)
    }

    /// Read the saved payload, if any.
    pub fn restore(&self) -> StorageResult<Option<String>> {
        match self.storage.get(&self.key) {
            Ok(json) => Ok(Some(json)),
            Err(StorageError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }
}

impl std::fmt::Debug for AutoSave {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSave")
            .field("key", &self.key)
            .field("dirty", &self.dirty)
            .field("saves", &self.saves)
            .finish()
    }
}
