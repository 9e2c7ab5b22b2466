//! Persistence across reopen, exercised through the public API only.

use std::sync::Arc;

use gabarita_protocol::User;
use gabarita_store::{FileStore, KeyValueStore, SessionStorage};

fn user() -> User {
    serde_json::from_value(serde_json::json!({
        "id": "u-7",
        "nome": "Bruno",
        "email": "bruno@example.com",
        "cargo": "Analista",
        "plano": "premium"
    }))
    .unwrap()
}

#[test]
fn test_file_store_session_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let store = Arc::new(FileStore::open(&path).unwrap());
        let storage = SessionStorage::new(store);
        storage.save_session(&user(), "a1", Some("r1")).unwrap();
    }

    let reopened = SessionStorage::new(Arc::new(FileStore::open(&path).unwrap()));
    assert_eq!(reopened.user().unwrap(), Some(user()));
    assert_eq!(reopened.access_token().unwrap().as_deref(), Some("a1"));
    assert_eq!(reopened.refresh_token().unwrap().as_deref(), Some("r1"));
}

#[test]
fn test_file_store_clear_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let storage = SessionStorage::new(Arc::new(FileStore::open(&path).unwrap()));
    storage.save_session(&user(), "a1", Some("r1")).unwrap();

    storage.clear().unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("user").unwrap(), None);
    assert_eq!(reopened.get("authToken").unwrap(), None);
    assert_eq!(reopened.get("refreshToken").unwrap(), None);
}

#[test]
fn test_file_store_keeps_unrelated_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = Arc::new(FileStore::open(&path).unwrap());
    store.set("lastRoute", "/dashboard").unwrap();

    SessionStorage::new(store.clone()).clear().unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("lastRoute").unwrap().as_deref(), Some("/dashboard"));
}
