//! The request pipeline: bearer, 401, single-flight refresh, one replay.
//!
//! Every call runs through [`ApiClient::execute`]:
//!
//! ```text
//!           ┌──── 2xx ────────────────────────────→ Done
//! Sent ─────┼──── 401 (first) ──→ Refreshing ──┬──→ SentRetry ──→ Done | Failed
//!           │                                  └──→ SessionCleared ──→ Failed
//!           └──── other ──────────────────────────→ Failed
//! ```
//!
//! A request is replayed at most once. A 401 on the replay is a plain
//! backend failure; it never starts a second refresh.

use std::sync::Arc;

use gabarita_protocol::{ApiResponse, Codec, JsonCodec, RefreshPayload, RefreshRequest};
use gabarita_store::SessionStorage;
use gabarita_transport::{CancelToken, HttpRequest, HttpResponse, HttpTransport, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::{ClientConfig, ClientError, Navigator};

type ExpiryListener = Box<dyn Fn() + Send + Sync>;

/// How a call authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    /// Attach the bearer token and run the refresh flow on a 401.
    Refreshing,
    /// Attach the bearer token, but treat a 401 as a plain failure.
    BearerOnly,
    /// Send no credentials. A 401 here means "wrong credentials", not
    /// "expired token", so it never triggers a refresh.
    Anonymous,
}

/// One logical backend call, before it is turned into HTTP.
#[derive(Debug)]
pub(crate) struct Call<'a> {
    pub method: Method,
    pub path: &'a str,
    pub body: Option<Vec<u8>>,
    /// Error text used when the backend gives none.
    pub fallback: &'a str,
    pub auth: Auth,
}

impl<'a> Call<'a> {
    pub fn new(method: Method, path: &'a str, fallback: &'a str) -> Self {
        Self {
            method,
            path,
            body: None,
            fallback,
            auth: Auth::Refreshing,
        }
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = auth;
        self
    }
}

/// The authenticated backend client.
///
/// Generic over the transport so tests can script responses. Share it
/// with `Arc<ApiClient<T>>`; every method takes `&self`.
///
/// ## Single-flight refresh
///
/// Requests that hit a 401 serialise on `refresh_gate`. Whoever gets the
/// gate first performs the refresh. Everyone after it re-reads storage:
/// if the stored access token is no longer the one they were rejected
/// with, somebody already refreshed and they replay with the new token
/// without calling the refresh endpoint again.
pub struct ApiClient<T: HttpTransport> {
    transport: T,
    config: ClientConfig,
    storage: SessionStorage,
    navigator: Arc<dyn Navigator>,
    codec: JsonCodec,
    refresh_gate: Mutex<()>,
    expiry_listeners: std::sync::Mutex<Vec<ExpiryListener>>,
}

impl<T: HttpTransport> ApiClient<T> {
    pub fn new(
        transport: T,
        config: ClientConfig,
        storage: SessionStorage,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        tracing::debug!(base_url = %config.base_url, "api client created");
        Self {
            transport,
            config,
            storage,
            navigator,
            codec: JsonCodec,
            refresh_gate: Mutex::new(()),
            expiry_listeners: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Registers `listener` to run every time the client clears an expired
    /// session.
    ///
    /// Listeners run synchronously on the task that saw the failed refresh,
    /// after storage is cleared and before the caller gets
    /// [`ClientError::AuthExpired`]. They must not call back into the client.
    pub fn on_session_expired(&self, listener: impl Fn() + Send + Sync + 'static) {
        self.expiry_listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Box::new(listener));
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session keys this client reads tokens from and refreshes into.
    pub fn storage(&self) -> &SessionStorage {
        &self.storage
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // -----------------------------------------------------------------------
    // Generic calls
    // -----------------------------------------------------------------------

    /// Sends an authenticated request and decodes the JSON response body.
    ///
    /// An empty response body decodes as JSON `null`, so `R = ()` works
    /// for endpoints that return nothing.
    ///
    /// # Errors
    /// See [`ClientError`]. A first 401 is resolved internally by the
    /// refresh flow and never surfaces as `Backend { status: 401 }`.
    pub async fn request<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        cancel: &CancelToken,
    ) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut call = Call::new(method, path, "request failed");
        if let Some(body) = body {
            call = call.body(self.codec.encode(body)?);
        }
        let response = self.execute(call, cancel).await?;
        self.decode(&response)
    }

    pub async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        cancel: &CancelToken,
    ) -> Result<R, ClientError> {
        self.request::<(), R>(Method::Get, path, None, cancel).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B, cancel: &CancelToken) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::Post, path, Some(body), cancel).await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B, cancel: &CancelToken) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::Put, path, Some(body), cancel).await
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    /// Runs one logical call to completion and returns a 2xx response.
    pub(crate) async fn execute(
        &self,
        call: Call<'_>,
        cancel: &CancelToken,
    ) -> Result<HttpResponse, ClientError> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let token = match call.auth {
            Auth::Anonymous => None,
            Auth::Refreshing | Auth::BearerOnly => self.storage.access_token()?,
        };

        tracing::debug!(method = %call.method, path = call.path, "sending request");
        let response = self.send(self.build(&call, token.as_deref()), cancel).await?;

        if !(response.is_unauthorized() && call.auth == Auth::Refreshing) {
            return self.check(response, call.fallback);
        }

        tracing::debug!(path = call.path, "access token rejected, refreshing");
        let Some(fresh) = self.refresh_access_token(token.as_deref(), cancel).await? else {
            return Err(ClientError::AuthExpired);
        };

        tracing::debug!(method = %call.method, path = call.path, "replaying request");
        let replay = self.send(self.build(&call, Some(&fresh)), cancel).await?;
        self.check(replay, call.fallback)
    }

    fn build(&self, call: &Call<'_>, token: Option<&str>) -> HttpRequest {
        let mut request = HttpRequest::new(call.method, self.config.url(call.path));
        if let Some(body) = &call.body {
            request = request.json_body(body.clone());
        }
        if let Some(token) = token {
            request = request.bearer(token);
        }
        request
    }

    /// One transport round trip, abandoned if `cancel` fires first.
    async fn send(
        &self,
        request: HttpRequest,
        cancel: &CancelToken,
    ) -> Result<HttpResponse, ClientError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(url = %request.url, "request cancelled");
                Err(ClientError::Cancelled)
            }
            result = self.transport.send(request.clone()) => Ok(result?),
        }
    }

    /// Maps a non-2xx response to [`ClientError::Backend`].
    fn check(&self, response: HttpResponse, fallback: &str) -> Result<HttpResponse, ClientError> {
        if response.is_success() {
            return Ok(response);
        }
        let message = error_message(&response.body).unwrap_or_else(|| fallback.to_string());
        tracing::debug!(status = response.status, %message, "backend returned an error");
        Err(ClientError::Backend {
            status: response.status,
            message,
        })
    }

    pub(crate) fn decode<R: DeserializeOwned>(&self, response: &HttpResponse) -> Result<R, ClientError> {
        let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &response.body
        };
        Ok(self.codec.decode(body)?)
    }

    pub(crate) fn encode<B: Serialize + ?Sized>(&self, body: &B) -> Result<Vec<u8>, ClientError> {
        Ok(self.codec.encode(body)?)
    }

    // -----------------------------------------------------------------------
    // Refresh
    // -----------------------------------------------------------------------

    /// Obtains an access token to replace `rejected`.
    ///
    /// Returns `Ok(None)` when no refresh is possible (no refresh token,
    /// or the refresh endpoint refused). The session is expired before the
    /// gate is released, so a waiter never retries a refresh token that
    /// was just refused.
    async fn refresh_access_token(
        &self,
        rejected: Option<&str>,
        cancel: &CancelToken,
    ) -> Result<Option<String>, ClientError> {
        let _gate = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            gate = self.refresh_gate.lock() => gate,
        };

        if let Some(current) = self.storage.access_token()? {
            if Some(current.as_str()) != rejected {
                tracing::debug!("access token already refreshed by a concurrent request");
                return Ok(Some(current));
            }
        }

        let Some(refresh_token) = self.storage.refresh_token()? else {
            tracing::debug!("no refresh token stored");
            self.expire_session();
            return Ok(None);
        };

        match self.call_refresh(&refresh_token, cancel).await {
            Ok(token) => {
                if cancel.is_cancelled() {
                    return Err(ClientError::Cancelled);
                }
                self.storage.set_access_token(&token)?;
                tracing::info!("access token refreshed");
                Ok(Some(token))
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed");
                self.expire_session();
                Ok(None)
            }
        }
    }

    /// Calls the refresh endpoint with the given refresh token.
    async fn call_refresh(
        &self,
        refresh_token: &str,
        cancel: &CancelToken,
    ) -> Result<String, ClientError> {
        let body = self.encode(&RefreshRequest {
            refresh_token: refresh_token.to_string(),
        })?;
        let request = HttpRequest::new(Method::Post, self.config.url(&self.config.refresh_path))
            .json_body(body);
        let response = self.send(request, cancel).await?;
        let response = self.check(response, "token refresh failed")?;
        let envelope: ApiResponse<RefreshPayload> = self.decode(&response)?;
        let status = response.status;
        match envelope.into_data() {
            Some(payload) => Ok(payload.token),
            None => Err(ClientError::Backend {
                status,
                message: "token refresh was not accepted".to_string(),
            }),
        }
    }

    /// Refreshes the access token on demand, outside the 401 flow.
    ///
    /// Holds the same gate as the automatic refresh, so it never races it.
    ///
    /// # Errors
    /// [`ClientError::AuthExpired`] when no refresh token is stored. Other
    /// failures are returned as-is and leave the session untouched.
    pub async fn refresh(&self, cancel: &CancelToken) -> Result<String, ClientError> {
        let _gate = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            gate = self.refresh_gate.lock() => gate,
        };
        let refresh_token = self.storage.refresh_token()?.ok_or(ClientError::AuthExpired)?;
        let token = self.call_refresh(&refresh_token, cancel).await?;
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }
        self.storage.set_access_token(&token)?;
        tracing::info!("access token refreshed on request");
        Ok(token)
    }

    /// Clears the stored session and sends the host to the login route,
    /// unless it is already there.
    fn expire_session(&self) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "failed to clear expired session");
        }
        let listeners = self.expiry_listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners.iter().for_each(|listener| listener());
        drop(listeners);
        let login = self.config.login_route.as_str();
        if self.navigator.current_route().as_deref() == Some(login) {
            tracing::info!("session expired");
            return;
        }
        tracing::info!(route = login, "session expired, redirecting to login");
        self.navigator.navigate(login);
    }
}

/// Picks the backend's `error` field, then `message`.
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| {
            let text = value.get(*key)?.as_str()?;
            (!text.is_empty()).then(|| text.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_error_field() {
        let body = br#"{"error":"specific","message":"generic"}"#;
        assert_eq!(error_message(body).as_deref(), Some("specific"));
    }

    #[test]
    fn test_error_message_falls_back_to_message_field() {
        let body = br#"{"message":"generic"}"#;
        assert_eq!(error_message(body).as_deref(), Some("generic"));
    }

    #[test]
    fn test_error_message_non_json_body_is_none() {
        assert_eq!(error_message(b"<html>502 Bad Gateway</html>"), None);
        assert_eq!(error_message(br#"{"error":42}"#), None);
    }
}
