//! Key/value persistence backends
//!
//! Stats and settings are stored as small JSON strings under fixed keys.
//! Backends:
//! - `MemoryStore`: in-process map (tests, embedding)
//! - `FileStore`: one file per key in a directory (native)
//! - `LocalStore`: browser LocalStorage (wasm32)

use std::collections::HashMap;
use std::io;

mod file;

pub use file::FileStore;

/// Minimal string key/value storage
pub trait KeyValueStore {
    /// `Ok(None)` when the key has never been written
    fn get_item(&self, key: &str) -> io::Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStore;

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    fn storage() -> io::Result<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Unsupported, "LocalStorage unavailable"))
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> io::Result<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| io::Error::other("LocalStorage read failed"))
    }

    fn set_item(&mut self, key: &str, value: &str) -> io::Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| io::Error::other("LocalStorage write failed"))
    }
}
