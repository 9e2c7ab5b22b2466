//! Error types for the client layer.

use gabarita_protocol::ProtocolError;
use gabarita_store::StoreError;
use gabarita_transport::TransportError;

/// Everything a backend call can fail with.
///
/// Callers never see raw transport status handling: a non-2xx response is
/// either resolved by the refresh flow or mapped to one of these variants.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No response arrived (connection refused, DNS, timeout).
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// The access token was rejected and could not be refreshed.
    ///
    /// By the time this is returned the stored session has already been
    /// cleared and the navigator sent to the login route.
    #[error("session expired, please sign in again")]
    AuthExpired,

    /// The call was refused locally before any request was made.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The backend answered with a failure.
    #[error("backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// The caller's [`CancelToken`](gabarita_transport::CancelToken) fired.
    #[error("request cancelled")]
    Cancelled,

    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(#[from] ProtocolError),

    /// Reading or writing the stored session failed.
    #[error("session storage error: {0}")]
    Storage(#[from] StoreError),
}

impl ClientError {
    /// `true` for [`ClientError::AuthExpired`]. The client has already
    /// cleared the session and redirected, so callers only need to
    /// display the error.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthExpired)
    }

    /// HTTP status of a backend failure, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}
