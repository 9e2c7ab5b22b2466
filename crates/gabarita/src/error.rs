//! Unified error type for the Gabarita client core.

use gabarita_client::ClientError;
use gabarita_games::GameError;
use gabarita_protocol::ProtocolError;
use gabarita_session::SessionError;
use gabarita_store::StoreError;
use gabarita_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Applications that use the `gabarita` facade handle this one type; the
/// `#[from]` conversions let `?` lift any layer's error into it.
#[derive(Debug, thiserror::Error)]
pub enum GabaritaError {
    /// No response arrived (connect, timeout).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Encoding or decoding failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Durable storage failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A backend call failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A session operation failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A game refused an action or its runner is gone.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The configuration could not be read.
    #[error("invalid configuration: {0}")]
    Config(String),
}
