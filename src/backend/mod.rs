//! Storage backend implementations.

use crate::error::Result;

#[cfg(feature = "filestore")]
pub mod file;
pub mod inmemory;

#[cfg(feature = "filestore")]
pub use file::FileBackend;
pub use inmemory::InMemoryBackend;

/// Trait for storage backend implementations.
///
/// Abstracts durable key-value storage, allowing swappable backends. The
/// store above this trait treats values as opaque bytes (in practice,
/// UTF-8 JSON arrays) and always reads and writes a whole collection as
/// one value.
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self` to allow
/// concurrent access. Backend implementations should use interior
/// mutability (DashMap, RwLock, or external storage).
///
/// **ASYNC:** All methods are async and must be awaited.
#[allow(async_fn_in_trait)]
pub trait StorageBackend: Send + Sync + Clone {
    /// Retrieve the value stored under `key`.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - Value present
    /// - `Ok(None)` - Key never written (or deleted)
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs (I/O failure, etc.)
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// Writes are last-write-wins whole-value replacement; there is no
    /// locking and no merge of concurrent writers.
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove the value stored under `key`. Removing an absent key is not
    /// an error.
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check whether `key` holds a value (optional optimization).
    ///
    /// # Errors
    /// Returns `Err` if a backend error occurs
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Health check - verify the backend is accessible.
    ///
    /// # Errors
    /// Returns `Err` if the backend is not accessible
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Optional: Remove every stored value (use with caution).
    ///
    /// # Errors
    /// Returns `Err` if the operation is not implemented or fails
    async fn clear_all(&self) -> Result<()> {
        Err(crate::error::Error::Other(
            "clear_all not implemented for this backend".to_string(),
        ))
    }
}
