//! HTTPS transport implementation using `reqwest`.

use std::time::Duration;

use crate::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};

/// A [`HttpTransport`] backed by a pooled `reqwest::Client`.
///
/// The timeout applies to the whole request (connect + send + read body).
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a transport with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Setup`] when the reqwest client cannot be
    /// constructed (for example, the TLS backend fails to initialise).
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;
        tracing::debug!(timeout_ms = timeout.as_millis() as u64, "reqwest transport ready");
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: HttpRequest,
    ) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        tracing::trace!(status, bytes = body.len(), "response received");

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Request(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_builds_client() {
        assert!(ReqwestTransport::new(Duration::from_secs(5)).is_ok());
    }

    #[tokio::test]
    async fn test_send_to_closed_port_is_transport_error() {
        let transport =
            ReqwestTransport::new(Duration::from_secs(2)).expect("client");
        // Port 9 (discard) on localhost is almost never listening.
        let req = HttpRequest::new(Method::Get, "http://127.0.0.1:9/ping");

        let result = transport.send(req).await;

        assert!(
            matches!(
                result,
                Err(TransportError::Connect(_))
                    | Err(TransportError::Request(_))
                    | Err(TransportError::Timeout)
            ),
            "expected a transport failure, got {result:?}"
        );
    }
}
