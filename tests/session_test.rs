//! Session restore, login and remember-me behaviour

mod helpers;

use std::sync::Arc;
use chrono::{Duration, Utc};
use serde_json::json;
use serial_test::serial;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};
use helpers::*;
use vip_transfer::session::{
    AuthContext, FileStorage, KeyValueStorage, Landing, MemoryStorage, SessionStore, TOKEN_EXPIRY_KEY,
    TOKEN_KEY,
};
use vip_transfer::models::UserRole;
use vip_transfer::Settings;

fn file_session(dir: &tempfile::TempDir) -> (Arc<FileStorage>, Arc<SessionStore>) {
    let storage = Arc::new(FileStorage::open(dir.path().join("session.json")).unwrap());
    let session = Arc::new(SessionStore::new(storage.clone(), Arc::new(MemoryStorage::new())));
    (storage, session)
}

async fn mock_me(backend: &BackendMockServer, role: &str) {
    backend
        .mock_ok("GET", "/auth/me", json!({ "user": user_json(USER_ID, "a@example.com", role) }))
        .await;
}

#[tokio::test]
async fn test_remember_me_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let backend = BackendMockServer::new().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "a@example.com", "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "token": "persisted-token",
            "user": user_json(USER_ID, "a@example.com", "driver")
        }))))
        .mount(&backend.server)
        .await;
    mock_me(&backend, "driver").await;

    {
        let (_, session) = file_session(&dir);
        let auth = AuthContext::new(backend.client(session), Duration::days(7));
        let user = auth.login("a@example.com", "secret1", None, true).await.unwrap();
        assert_eq!(user.role, UserRole::Driver);
        assert_eq!(auth.landing(), Some(Landing::DriverPortal));
    }

    let (storage, session) = file_session(&dir);
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("persisted-token"));
    assert!(storage.get(TOKEN_EXPIRY_KEY).is_some());

    let auth = AuthContext::new(backend.client(session), Duration::days(7));
    let restored = auth.restore().await.unwrap();
    assert_eq!(restored.map(|u| u.id), Some(USER_ID.to_string()));
    assert!(auth.is_authenticated());
}

#[tokio::test]
async fn test_session_only_login_is_not_written_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let backend = BackendMockServer::new().await;
    backend
        .mock_ok(
            "POST",
            "/auth/login",
            json!({ "token": "ephemeral", "user": user_json(USER_ID, "a@example.com", "admin") }),
        )
        .await;

    let (storage, session) = file_session(&dir);
    let auth = AuthContext::new(backend.client(session.clone()), Duration::days(7));
    auth.login("a@example.com", "secret1", Some(UserRole::Admin), false)
        .await
        .unwrap();

    assert_eq!(session.token().as_deref(), Some("ephemeral"));
    assert!(storage.get(TOKEN_KEY).is_none());
    assert!(session.expiry().is_none());
    assert_eq!(auth.landing(), Some(Landing::AdminConsole));
}

#[tokio::test]
async fn test_expired_token_is_cleared_without_a_request() {
    let backend = BackendMockServer::new().await;
    backend.expect_ok("GET", "/auth/me", json!({}), 0).await;

    let session = Arc::new(SessionStore::in_memory());
    let now = Utc::now();
    session
        .store_token("old", true, Duration::days(7), now - Duration::days(8))
        .unwrap();

    let auth = AuthContext::new(backend.client(session.clone()), Duration::days(7));
    assert!(auth.restore_at(now).await.unwrap().is_none());
    assert!(session.token().is_none());
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_missing_expiry_is_backfilled_for_persistent_tokens() {
    let backend = BackendMockServer::new().await;
    mock_me(&backend, "admin").await;

    let persistent = Arc::new(MemoryStorage::new());
    persistent.set(TOKEN_KEY, "legacy").unwrap();
    let session = Arc::new(SessionStore::new(persistent.clone(), Arc::new(MemoryStorage::new())));

    let now = Utc::now();
    let auth = AuthContext::new(backend.client(session.clone()), Duration::days(7));
    let user = auth.restore_at(now).await.unwrap();
    assert!(user.is_some());

    let expiry = session.expiry().expect("expiry backfilled");
    assert_eq!(expiry.timestamp_millis(), (now + Duration::days(7)).timestamp_millis());
}

#[tokio::test]
async fn test_rejected_token_is_cleared() {
    let backend = BackendMockServer::new().await;
    backend.mock_error("GET", "/auth/me", 401, "Token expired").await;

    let session = Arc::new(SessionStore::in_memory());
    session
        .store_token("revoked", true, Duration::days(7), Utc::now())
        .unwrap();

    let auth = AuthContext::new(backend.client(session.clone()), Duration::days(7));
    assert!(auth.restore().await.unwrap().is_none());
    assert!(session.token().is_none());
    assert!(session.expiry().is_none());
}

#[tokio::test]
async fn test_logout_clears_both_sides() {
    let backend = BackendMockServer::new().await;
    let session = Arc::new(SessionStore::in_memory());
    session
        .store_token("t", true, Duration::days(7), Utc::now())
        .unwrap();

    let auth = AuthContext::new(backend.client(session.clone()), Duration::days(7));
    auth.logout().unwrap();
    assert!(session.token().is_none());
    assert!(auth.current_user().is_none());
}

#[test]
#[serial]
fn test_api_url_env_override() {
    std::env::set_var("VIP_TRANSFER_API_URL", "https://transfers.example.com/api/");
    let settings = Settings::default();
    assert_eq!(settings.api_base_url(), "https://transfers.example.com/api");
    std::env::remove_var("VIP_TRANSFER_API_URL");
    assert_eq!(settings.api_base_url(), "http://localhost:5000/api");
}

#[test]
#[serial]
fn test_environment_layer_overrides_defaults() {
    std::env::set_var("VIPTRANSFER__POLLING__INTERVAL_MS", "2500");
    let settings = Settings::new().unwrap();
    std::env::remove_var("VIPTRANSFER__POLLING__INTERVAL_MS");

    assert_eq!(settings.polling.interval_ms, 2500);
    assert!(settings.validate().is_ok());
}
