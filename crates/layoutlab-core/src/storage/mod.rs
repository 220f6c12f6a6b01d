//! String-keyed persistence for saved layouts.

mod autosave;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use autosave::AutoSave;
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Key not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A string-keyed store of string values (browser localStorage, a
/// directory of files, a map).
///
/// Calls are synchronous; the editor runs on a single UI thread.
pub trait Storage {
    /// Read the value under `key`. Missing keys are [`StorageError::NotFound`].
    fn get(&self, key: &str) -> StorageResult<String>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// All stored keys.
    fn keys(&self) -> StorageResult<Vec<String>>;
}

/// Platform-appropriate storage: files under the user data directory on
/// native targets, localStorage in the browser.
#[cfg(not(target_arch = "wasm32"))]
pub fn default_storage() -> StorageResult<Box<dyn Storage>> {
    Ok(Box::new(FileStorage::default_location()?))
}

#[cfg(target_arch = "wasm32")]
pub fn default_storage() -> StorageResult<Box<dyn Storage>> {
    Ok(Box::new(LocalStorage::new()?))
}
