//! Browser localStorage backend.

use super::{Storage, StorageError, StorageResult};

/// Wraps `window.localStorage`.
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    pub fn new() -> StorageResult<Self> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Other("No window object".to_string()))?;
        let inner = window
            .local_storage()
            .map_err(|e| StorageError::Other(format!("localStorage unavailable: {e:?}")))?
            .ok_or_else(|| StorageError::Other("localStorage unavailable".to_string()))?;
        Ok(Self { inner })
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> StorageResult<String> {
        self.inner
            .get_item(key)
            .map_err(|e| StorageError::Io(format!("Failed to read {key}: {e:?}")))?
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.inner
            .set_item(key, value)
            .map_err(|e| StorageError::Io(format!("Failed to write {key}: {e:?}")))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.inner
            .remove_item(key)
            .map_err(|e| StorageError::Io(format!("Failed to delete {key}: {e:?}")))
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let len = self
            .inner
            .length()
            .map_err(|e| StorageError::Io(format!("Failed to list keys: {e:?}")))?;
        let mut keys = Vec::with_capacity(len as usize);
        for i in 0..len {
            if let Ok(Some(key)) = self.inner.key(i) {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
