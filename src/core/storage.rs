//! Client-side key/value storage
//!
//! The login flow persists the session token through [`KeyValueStore`].
//! In the browser this is `window.localStorage`; [`MemoryStore`] backs
//! server rendering, private-mode browsers without storage, and tests.

use std::cell::RefCell;
use std::collections::HashMap;

/// Storage key holding the provider-issued session token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to write key '{0}'")]
    WriteFailed(String),
}

/// Synchronous string key/value storage
pub trait KeyValueStore {
    /// Read a value, `None` if the key is absent
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write a value, overwriting any previous one
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store, lost on reload
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
