/// Errors that can occur in the transport layer.
///
/// Only failures where no HTTP response was received end up here.
/// A 4xx/5xx status is a successful transport round trip.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection could not be established (DNS, refused, TLS).
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The request was sent but reading the response failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The transport could not be constructed.
    #[error("transport setup failed: {0}")]
    Setup(String),
}
