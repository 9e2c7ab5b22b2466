//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire documents.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: a non-JSON error page from a proxy, missing
    /// required fields, or a backend contract change.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The document parsed but violates the envelope contract, e.g.
    /// `success: true` with no `data`.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
