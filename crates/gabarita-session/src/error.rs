//! Error types for the session layer.

use gabarita_client::ClientError;
use gabarita_store::StoreError;

/// Errors surfaced by [`AuthSession`](crate::AuthSession) operations.
///
/// Client failures are folded into a smaller set that a page can show
/// directly: the backend's own message for rejections, and a generic
/// line for everything the user cannot fix.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backend refused the operation. Carries its message verbatim
    /// (for example "invalid credentials").
    #[error("{0}")]
    Rejected(String),

    /// The backend could not be reached.
    #[error("could not reach the server: {0}")]
    Network(String),

    /// The session expired and could not be refreshed. Storage has already
    /// been cleared.
    #[error("session expired, please sign in again")]
    Expired,

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// Durable storage failed.
    #[error("session storage error: {0}")]
    Storage(#[from] StoreError),

    /// The input was refused before contacting the backend.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operation needs a signed-in user.
    #[error("not signed in")]
    NotAuthenticated,
}

impl From<ClientError> for SessionError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::Network(e) => Self::Network(e.to_string()),
            ClientError::AuthExpired => Self::Expired,
            ClientError::Validation(msg) => Self::InvalidInput(msg),
            ClientError::Backend { message, .. } => Self::Rejected(message),
            ClientError::Cancelled => Self::Cancelled,
            ClientError::Decode(e) => Self::Rejected(format!("unexpected server response: {e}")),
            ClientError::Storage(e) => Self::Storage(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_backend_error_keeps_message_verbatim() {
        let err = SessionError::from(ClientError::Backend {
            status: 401,
            message: "invalid credentials".into(),
        });
        assert_eq!(err.to_string(), "invalid credentials");
    }

    #[test]
    fn test_from_auth_expired_is_expired() {
        assert!(matches!(
            SessionError::from(ClientError::AuthExpired),
            SessionError::Expired
        ));
    }
}
