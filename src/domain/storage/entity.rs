//! Storage entity and key traits

use std::fmt::Debug;

/// A value usable as a storage key
pub trait StorageKey: Send + Sync + Debug {
    /// Encode the key as a map key string
    fn encode(&self) -> String;
}

/// An entity that can be stored
pub trait StorageEntity: Clone + Send + Sync + Debug {
    type Key: StorageKey;

    /// The entity's storage key
    fn key(&self) -> Self::Key;
}
