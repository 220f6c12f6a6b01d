//! File-based storage implementation for native platforms.

use super::{Storage, StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores each key as a JSON file in a directory.
#[derive(Debug)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a file storage rooted at `base_path`, creating the directory
    /// if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {e}"))
            })?;
        }
        Ok(Self { base_path })
    }

    /// File storage in the default location.
    ///
    /// On Unix: `~/.local/share/layoutlab/layouts/`
    /// On Windows: `%LOCALAPPDATA%\layoutlab\layouts\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("layoutlab").join("layouts"))
    }

    /// File path for `key`. See [`encode_key`].
    fn key_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", encode_key(key)))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// File-name-safe spelling of a storage key. ASCII alphanumerics, `-`
/// and `_` are kept; every other byte becomes `%XX`, so distinct keys never
/// share a file.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// Inverse of [`encode_key`]. `None` for names this storage did not write.
fn decode_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = name.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<String> {
        let path = self.key_path(key);
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(key.to_string()),
            _ => StorageError::Io(format!("Failed to read {}: {e}", path.display())),
        })
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.key_path(key);
        fs::write(&path, value)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(format!("Failed to delete {}: {e}", path.display()))),
        }
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let entries = fs::read_dir(&self.base_path)
            .map_err(|e| StorageError::Io(format!("Failed to read directory: {e}")))?;

        let mut keys = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(key) = path.file_stem().and_then(|s| s.to_str()).and_then(decode_key) {
                    keys.push(key);
                }
            }
        }
        Ok(keys)
    }
}
