//! Persistent key-value storage abstraction
//!
//! Values survive process restarts. Keys are small integers; the watchface
//! uses the same keys for storage and for its inbound message protocol.

use thiserror::Error;

/// Storage failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// The store has no room for another key.
    #[error("storage full, cannot add key {0}")]
    Full(u32),
    /// The backing medium rejected the write.
    #[error("storage write failed")]
    WriteFailed,
    /// The backing medium holds data that does not decode.
    #[error("stored data is corrupt")]
    Corrupt,
}

/// Integer-keyed persistent store.
pub trait KeyValueStore {
    /// Returns `true` if a value has been written under `key`.
    fn exists(&self, key: u32) -> bool;

    /// Read the boolean stored under `key`, `None` when absent.
    fn read_bool(&self, key: u32) -> Option<bool>;

    /// Write `value` under `key`, replacing any previous value.
    fn write_bool(&mut self, key: u32, value: bool) -> Result<(), StorageError>;
}
