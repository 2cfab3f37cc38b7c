//! Narrow key/value storage port for Reddit Insight.
//!
//! The analysis cache and the theme watchlist both persist through this
//! interface, so tests can substitute [`MemoryStore`] for the filesystem
//! without touching the components built on top.

pub mod fs;
pub mod memory;

use thiserror::Error;

pub use fs::FsStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Whole-entry key/value storage.
///
/// No transactions, no expiry: reads and writes replace complete values, and
/// `delete` of an absent key succeeds. Implementations must be safe to share
/// across tasks.
pub trait StoragePort: Send + Sync {
    /// Returns the stored value for `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the underlying storage fails.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value` under `key`, replacing any prior entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the underlying storage fails.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes the entry for `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the underlying storage fails.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

// Shared handles count as stores, so a test can keep one end of an Arc and
// hand the other to the component under test.
impl<S: StoragePort + ?Sized> StoragePort for std::sync::Arc<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).write(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}
