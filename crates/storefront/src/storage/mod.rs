//! Durable key-value storage for client state.
//!
//! The cart and the i18n resolver persist through the same store under
//! different keys. Writes overwrite the whole value; reads and writes are
//! best effort and callers decide how to degrade.
//!
//! # Implementations
//!
//! - [`MemoryStore`] - in-process map with an optional byte quota
//! - [`FileStore`] - one JSON document on disk

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use thiserror::Error;

/// Storage keys.
pub mod keys {
    /// Key for the serialized cart lines.
    pub const CART_STATE: &str = "cart-state";

    /// Key for the chosen interface language.
    pub const LANGUAGE_PREFERENCE: &str = "language-preference";
}

/// Errors that can occur when reading or writing the store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying file operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing would exceed the store's quota.
    #[error("quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded {
        /// Total bytes the store would hold after the write.
        needed: usize,
        /// Configured limit.
        quota: usize,
    },

    /// A writer panicked while holding the lock.
    #[error("store lock poisoned")]
    Poisoned,
}

/// Whether a change reached durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    Saved,
    /// The write failed; the change only lives in memory.
    Failed(String),
}

impl Persistence {
    /// Whether the write succeeded.
    #[must_use]
    pub const fn is_saved(&self) -> bool {
        matches!(self, Self::Saved)
    }
}

impl From<Result<(), StorageError>> for Persistence {
    fn from(result: Result<(), StorageError>) -> Self {
        match result {
            Ok(()) => Self::Saved,
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// A string key-value store with whole-value overwrites.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be stored.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
