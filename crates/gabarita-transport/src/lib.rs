//! HTTP transport abstraction for Gabarita.
//!
//! Provides the [`HttpTransport`] trait that the API client sends every
//! request through, plus the plain value types that cross that seam
//! ([`HttpRequest`], [`HttpResponse`], [`Method`]).
//!
//! Keeping the transport behind a trait means the client's token-refresh
//! logic can be exercised against a scripted fake in tests, and the real
//! network stack can be swapped without touching the client.
//!
//! # Feature Flags
//!
//! - `reqwest` (default): HTTPS transport via `reqwest` ([`ReqwestTransport`])

#![allow(async_fn_in_trait)]

mod cancel;
mod error;
#[cfg(feature = "reqwest")]
mod reqwest_transport;

pub use cancel::CancelToken;
pub use error::TransportError;
#[cfg(feature = "reqwest")]
pub use reqwest_transport::ReqwestTransport;

use std::fmt;
use std::future::Future;

/// The HTTP verbs the backend API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// An outbound request, fully resolved (absolute URL, final headers).
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// The HTTP verb.
    pub method: Method,
    /// Absolute URL (base URL + path).
    pub url: String,
    /// Header name/value pairs, in insertion order.
    pub headers: Vec<(String, String)>,
    /// Raw request body, if any.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a request with no headers and no body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attaches a JSON body and the matching `Content-Type` header.
    pub fn json_body(mut self, body: Vec<u8>) -> Self {
        self.set_header("Content-Type", "application/json");
        self.body = Some(body);
        self
    }

    /// Sets `Authorization: Bearer <token>`, replacing any previous value.
    ///
    /// Used both for the first attempt and for the replay after a token
    /// refresh, so it must overwrite rather than append.
    pub fn bearer(mut self, token: &str) -> Self {
        self.set_header("Authorization", &format!("Bearer {token}"));
        self
    }

    /// Sets a header, replacing an existing one with the same name
    /// (case-insensitive).
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Returns the value of a header (case-insensitive lookup).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Credentials travel in headers, so `Debug` only prints header names.
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> =
            self.headers.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &names)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .finish()
    }
}

/// A response as seen by the client: status code and raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body (usually JSON).
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response from a status and body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `true` for 401 Unauthorized.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Sends requests to the backend.
///
/// # Trait bounds
///
/// - `Send + Sync` → one transport is shared by every request the client
///   issues, possibly from several tasks at once.
/// - `'static` → it lives as long as the client.
///
/// A non-2xx status is NOT an error at this layer. It comes back as an
/// `Ok(HttpResponse)` so the client can decide what a 401 means.
/// `Err` is reserved for failures where no response arrived at all.
pub trait HttpTransport: Send + Sync + 'static {
    /// Sends one request and waits for the complete response.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}
