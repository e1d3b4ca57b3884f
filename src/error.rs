use thiserror::Error;

/// Errors reported by the fallible map operations.
///
/// A failed operation never modifies the map.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The key compares equal to a key already in the map.
    #[error("key is already present in the map")]
    DuplicateKey,

    #[error("key not found in the map")]
    KeyNotFound,

    /// No key was supplied to an indexer-style accessor.
    #[error("invalid key: no key supplied")]
    InvalidKey,
}

pub type Result<T> = std::result::Result<T, Error>;
