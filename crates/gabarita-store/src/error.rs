//! Error types for the storage layer.

use gabarita_protocol::ProtocolError;

/// Errors that can occur while reading or writing durable storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be encoded or decoded.
    ///
    /// For the backing file itself this means it is not a JSON object.
    /// For the `user` key it means the record is corrupt.
    #[error("stored value is malformed: {0}")]
    Codec(#[from] ProtocolError),

    /// A thread panicked while holding the store's lock.
    #[error("storage lock poisoned")]
    Poisoned,
}
