//! Integration tests for the 401 → refresh → replay pipeline, driven by a
//! scripted transport.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use gabarita_client::{ApiClient, CancelToken, ClientConfig, ClientError, Navigator};
use gabarita_protocol::User;
use gabarita_store::{MemoryStore, SessionStorage};
use gabarita_transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use serde_json::{Value, json};

// =========================================================================
// Fake transport: answers every request with a closure, records calls.
// =========================================================================

type Handler = dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync;

#[derive(Clone)]
struct FakeTransport {
    handler: Arc<Handler>,
    calls: Arc<Mutex<Vec<HttpRequest>>>,
    latency: Duration,
}

impl FakeTransport {
    fn new(
        handler: impl Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Arc::new(handler),
            calls: Arc::new(Mutex::new(Vec::new())),
            latency: Duration::ZERO,
        }
    }

    fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn calls_to(&self, path: &str) -> usize {
        self.calls().iter().filter(|r| r.url.ends_with(path)).count()
    }
}

impl HttpTransport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        (self.handler)(&request)
    }
}

fn json_response(status: u16, body: Value) -> Result<HttpResponse, TransportError> {
    Ok(HttpResponse::new(status, body.to_string()))
}

/// Backend that accepts only `Bearer fresh` and refreshes to `fresh`.
fn refreshing_backend(request: &HttpRequest) -> Result<HttpResponse, TransportError> {
    if request.url.ends_with(REFRESH) {
        return json_response(200, json!({ "success": true, "data": { "token": "fresh" } }));
    }
    match request.header("Authorization") {
        Some("Bearer fresh") => json_response(200, json!({ "ok": true })),
        _ => json_response(401, json!({ "message": "token expired" })),
    }
}

const REFRESH: &str = "/api/auth/refresh-token";

// =========================================================================
// Navigator that remembers where it was sent.
// =========================================================================

#[derive(Default)]
struct RecordingNavigator {
    current: Mutex<Option<String>>,
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    fn at(route: &str) -> Self {
        Self {
            current: Mutex::new(Some(route.to_string())),
            visits: Mutex::new(Vec::new()),
        }
    }

    fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_route(&self) -> Option<String> {
        self.current.lock().unwrap().clone()
    }

    fn navigate(&self, route: &str) {
        *self.current.lock().unwrap() = Some(route.to_string());
        self.visits.lock().unwrap().push(route.to_string());
    }
}

// =========================================================================
// Helpers
// =========================================================================

fn user() -> User {
    serde_json::from_value(json!({
        "id": "u-1",
        "nome": "Ana",
        "email": "ana@example.com",
        "plano": "free"
    }))
    .unwrap()
}

struct Fixture {
    client: Arc<ApiClient<FakeTransport>>,
    transport: FakeTransport,
    storage: SessionStorage,
    navigator: Arc<RecordingNavigator>,
}

fn fixture(transport: FakeTransport, navigator: RecordingNavigator) -> Fixture {
    let storage = SessionStorage::new(Arc::new(MemoryStore::new()));
    let navigator = Arc::new(navigator);
    let client = Arc::new(ApiClient::new(
        transport.clone(),
        ClientConfig::default(),
        storage.clone(),
        navigator.clone(),
    ));
    Fixture {
        client,
        transport,
        storage,
        navigator,
    }
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_request_attaches_bearer_token() {
    let f = fixture(FakeTransport::new(refreshing_backend), RecordingNavigator::at("/dashboard"));
    f.storage.save_session(&user(), "fresh", Some("r1")).unwrap();

    let body: Value = f.client.get("/api/planos", &CancelToken::new()).await.unwrap();

    assert_eq!(body, json!({ "ok": true }));
    let calls = f.transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].header("Authorization"), Some("Bearer fresh"));
}

#[tokio::test]
async fn test_request_401_with_refresh_token_refreshes_once_and_replays_once() {
    let f = fixture(FakeTransport::new(refreshing_backend), RecordingNavigator::at("/dashboard"));
    f.storage.save_session(&user(), "stale", Some("r1")).unwrap();

    let body: Value = f.client.get("/api/planos", &CancelToken::new()).await.unwrap();

    assert_eq!(body, json!({ "ok": true }));
    assert_eq!(f.transport.calls_to(REFRESH), 1);
    assert_eq!(f.transport.calls_to("/api/planos"), 2, "original + one replay");

    let refresh_call = &f.transport.calls()[1];
    assert_eq!(refresh_call.header("Authorization"), None);
    let sent: Value = serde_json::from_slice(refresh_call.body.as_deref().unwrap()).unwrap();
    assert_eq!(sent, json!({ "refreshToken": "r1" }));

    assert_eq!(f.storage.access_token().unwrap().as_deref(), Some("fresh"));
    assert_eq!(f.storage.refresh_token().unwrap().as_deref(), Some("r1"));
    assert!(f.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_request_401_without_refresh_token_clears_session_without_replay() {
    let f = fixture(FakeTransport::new(refreshing_backend), RecordingNavigator::at("/dashboard"));
    f.storage.save_session(&user(), "stale", None).unwrap();

    let result: Result<Value, _> = f.client.get("/api/planos", &CancelToken::new()).await;

    assert!(matches!(result, Err(ClientError::AuthExpired)));
    assert_eq!(f.transport.calls().len(), 1, "no refresh call, no replay");
    assert_eq!(f.storage.user().unwrap(), None);
    assert_eq!(f.storage.access_token().unwrap(), None);
    assert_eq!(f.navigator.visits(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_request_refresh_rejected_clears_session_and_redirects() {
    let transport = FakeTransport::new(|request| {
        if request.url.ends_with(REFRESH) {
            json_response(401, json!({ "success": false, "error": "refresh token revoked" }))
        } else {
            json_response(401, json!({}))
        }
    });
    let f = fixture(transport, RecordingNavigator::at("/perfil"));
    f.storage.save_session(&user(), "stale", Some("revoked")).unwrap();

    let result: Result<Value, _> = f.client.get("/api/user/profile", &CancelToken::new()).await;

    assert!(result.unwrap_err().is_auth_expired());
    assert_eq!(f.transport.calls_to(REFRESH), 1);
    assert_eq!(f.transport.calls_to("/api/user/profile"), 1);
    assert_eq!(f.storage.refresh_token().unwrap(), None);
    assert_eq!(f.navigator.visits(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_request_expired_on_login_route_does_not_navigate() {
    let f = fixture(FakeTransport::new(refreshing_backend), RecordingNavigator::at("/login"));

    let result: Result<Value, _> = f.client.get("/api/planos", &CancelToken::new()).await;

    assert!(matches!(result, Err(ClientError::AuthExpired)));
    assert!(f.navigator.visits().is_empty());
}

#[tokio::test]
async fn test_request_401_on_replay_does_not_refresh_again() {
    let transport = FakeTransport::new(|request| {
        if request.url.ends_with(REFRESH) {
            json_response(200, json!({ "success": true, "data": { "token": "fresh" } }))
        } else {
            json_response(401, json!({ "error": "forbidden for this plan" }))
        }
    });
    let f = fixture(transport, RecordingNavigator::at("/dashboard"));
    f.storage.save_session(&user(), "stale", Some("r1")).unwrap();

    let result: Result<Value, _> = f.client.get("/api/ranking/abc", &CancelToken::new()).await;

    match result {
        Err(ClientError::Backend { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "forbidden for this plan");
        }
        other => panic!("expected Backend error, got {other:?}"),
    }
    assert_eq!(f.transport.calls_to(REFRESH), 1);
    assert_eq!(f.transport.calls().len(), 3);
    assert_eq!(f.storage.access_token().unwrap().as_deref(), Some("fresh"));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_401s_share_one_refresh() {
    let transport =
        FakeTransport::new(refreshing_backend).with_latency(Duration::from_millis(50));
    let f = fixture(transport, RecordingNavigator::at("/dashboard"));
    f.storage.save_session(&user(), "stale", Some("r1")).unwrap();
    let cancel = CancelToken::new();

    let (a, b, c) = tokio::join!(
        f.client.get::<Value>("/api/planos", &cancel),
        f.client.get::<Value>("/api/noticias/x", &cancel),
        f.client.get::<Value>("/api/ranking/x", &cancel),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(f.transport.calls_to(REFRESH), 1);
    assert_eq!(f.transport.calls().len(), 7, "3 rejected + 1 refresh + 3 replays");
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_401s_with_rejected_refresh_expire_once() {
    let transport = FakeTransport::new(|_| json_response(401, json!({ "error": "expired" })))
        .with_latency(Duration::from_millis(50));
    let f = fixture(transport, RecordingNavigator::at("/dashboard"));
    f.storage.save_session(&user(), "stale", Some("r1")).unwrap();
    let cancel = CancelToken::new();

    let (a, b, c) = tokio::join!(
        f.client.get::<Value>("/api/planos", &cancel),
        f.client.get::<Value>("/api/noticias/x", &cancel),
        f.client.get::<Value>("/api/ranking/x", &cancel),
    );

    for result in [a, b, c] {
        assert!(matches!(result, Err(ClientError::AuthExpired)));
    }
    assert_eq!(f.transport.calls_to(REFRESH), 1);
    assert_eq!(f.transport.calls().len(), 4, "3 rejected + 1 refresh, no replays");
    assert_eq!(f.navigator.visits(), vec!["/login".to_string()]);
    assert_eq!(f.storage.access_token().unwrap(), None);
}

#[tokio::test]
async fn test_on_session_expired_runs_after_storage_is_cleared() {
    let f = fixture(FakeTransport::new(refreshing_backend), RecordingNavigator::at("/dashboard"));
    f.storage.save_session(&user(), "stale", None).unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let storage = f.storage.clone();
    let sink = seen.clone();
    f.client.on_session_expired(move || {
        sink.lock().unwrap().push(storage.access_token().unwrap());
    });

    let result: Result<Value, _> = f.client.get("/api/planos", &CancelToken::new()).await;

    assert!(matches!(result, Err(ClientError::AuthExpired)));
    assert_eq!(*seen.lock().unwrap(), vec![None]);
}

#[tokio::test(start_paused = true)]
async fn test_request_cancelled_while_pending_returns_cancelled() {
    let transport =
        FakeTransport::new(refreshing_backend).with_latency(Duration::from_secs(10));
    let f = fixture(transport, RecordingNavigator::at("/dashboard"));
    f.storage.save_session(&user(), "stale", Some("r1")).unwrap();
    let cancel = CancelToken::new();

    let (result, ()) = tokio::join!(f.client.get::<Value>("/api/planos", &cancel), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();
    });

    assert!(matches!(result, Err(ClientError::Cancelled)));
    assert_eq!(f.transport.calls_to(REFRESH), 0);
    assert_eq!(f.storage.access_token().unwrap().as_deref(), Some("stale"));
}

#[tokio::test]
async fn test_request_with_cancelled_token_sends_nothing() {
    let f = fixture(FakeTransport::new(refreshing_backend), RecordingNavigator::default());
    let cancel = CancelToken::new();
    cancel.cancel();

    let result = f.client.get::<Value>("/api/planos", &cancel).await;

    assert!(matches!(result, Err(ClientError::Cancelled)));
    assert!(f.transport.calls().is_empty());
}

#[tokio::test]
async fn test_request_server_error_maps_to_backend_with_message() {
    let transport = FakeTransport::new(|_| json_response(500, json!({ "error": "database down" })));
    let f = fixture(transport, RecordingNavigator::default());

    let result = f.client.get::<Value>("/api/planos", &CancelToken::new()).await;

    match result {
        Err(ClientError::Backend { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database down");
        }
        other => panic!("expected Backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_request_transport_failure_maps_to_network() {
    let transport =
        FakeTransport::new(|_| Err(TransportError::Connect("connection refused".into())));
    let f = fixture(transport, RecordingNavigator::default());

    let result = f.client.get::<Value>("/api/planos", &CancelToken::new()).await;

    assert!(matches!(result, Err(ClientError::Network(TransportError::Connect(_)))));
}

#[tokio::test]
async fn test_login_bad_credentials_surfaces_backend_message_without_refresh() {
    let transport = FakeTransport::new(|_| {
        json_response(401, json!({ "success": false, "error": "invalid credentials" }))
    });
    let f = fixture(transport, RecordingNavigator::at("/login"));
    f.storage.save_session(&user(), "old", Some("r-old")).unwrap();

    let result = f.client.login("ana@example.com", "wrong", &CancelToken::new()).await;

    match result {
        Err(ClientError::Backend { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid credentials");
        }
        other => panic!("expected Backend error, got {other:?}"),
    }
    assert_eq!(f.transport.calls().len(), 1);
    assert_eq!(f.transport.calls()[0].header("Authorization"), None);
    assert_eq!(f.storage.access_token().unwrap().as_deref(), Some("old"));
}

#[tokio::test]
async fn test_login_empty_password_is_validation_error() {
    let f = fixture(FakeTransport::new(refreshing_backend), RecordingNavigator::default());

    let result = f.client.login("ana@example.com", "", &CancelToken::new()).await;

    assert!(matches!(result, Err(ClientError::Validation(_))));
    assert!(f.transport.calls().is_empty());
}

#[tokio::test]
async fn test_logout_401_is_not_refreshed() {
    let f = fixture(FakeTransport::new(refreshing_backend), RecordingNavigator::at("/dashboard"));
    f.storage.save_session(&user(), "stale", Some("r1")).unwrap();

    let result = f.client.logout(&CancelToken::new()).await;

    assert!(matches!(result, Err(ClientError::Backend { status: 401, .. })));
    assert_eq!(f.transport.calls_to(REFRESH), 0);
}

#[tokio::test]
async fn test_explicit_refresh_persists_new_token() {
    let f = fixture(FakeTransport::new(refreshing_backend), RecordingNavigator::default());
    f.storage.save_session(&user(), "stale", Some("r1")).unwrap();

    let token = f.client.refresh(&CancelToken::new()).await.unwrap();

    assert_eq!(token, "fresh");
    assert_eq!(f.storage.access_token().unwrap().as_deref(), Some("fresh"));
}
