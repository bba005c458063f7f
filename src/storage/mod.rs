pub mod json_backend;
pub mod memory;

use crate::errors::Result;

/// A durable key-value store holding whole serialized payloads per slot.
///
/// Slots are read whole and written whole; there is no partial update.
pub trait StorageBackend: Send + Sync {
    /// Returns the payload stored under `key`, or `None` when the slot is empty.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the payload stored under `key`.
    fn write(&self, key: &str, payload: &str) -> Result<()>;
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;
