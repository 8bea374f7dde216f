//! Integration tests for the login and logout flows.

use chrono::{Duration, Utc};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use portal_core::error::ErrorKind;
use portal_core::types::LoginCredentials;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_persistent_login_lands_in_durable_backend() {
    let app = TestApp::new().await;
    app.mount_login("t1", "admin", Some(Utc::now() + Duration::hours(1)))
        .await;

    let session = app
        .session
        .login(&LoginCredentials::new("alice", "x"), true)
        .await
        .unwrap();

    assert_eq!(session.token.as_deref(), Some("t1"));
    assert!(session.persistent);

    // The durable backend holds the copy; the volatile one is empty.
    use portal_store::StorageBackend;
    assert!(app.volatile.load().await.is_none());
    assert_eq!(app.durable.load().await.unwrap().token, "t1");
    assert!(app.store.is_persistent_active().await);

    // The guard admits the admin to the admin route.
    let navigation = app.router.navigate("/admin").await;
    assert!(navigation.entered());
}

#[tokio::test]
async fn test_volatile_login_leaves_durable_backend_empty() {
    let app = TestApp::new().await;
    app.login_as("admin", false).await;

    use portal_store::StorageBackend;
    assert_eq!(app.volatile.load().await.unwrap().token, "t1");
    assert!(app.durable.load().await.is_none());
    assert!(!app.store.is_persistent_active().await);
}

#[tokio::test]
async fn test_rejected_credentials_leave_no_partial_state() {
    let app = TestApp::new().await;
    app.mount_login_failure(401, "Wrong username or password")
        .await;

    let err = app
        .session
        .login(&LoginCredentials::new("alice", "wrong"), true)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidCredentials);
    assert!(!app.session.is_authenticated().await);
    assert!(app.store.load().await.token.is_none());
}

#[tokio::test]
async fn test_login_failure_classification() {
    for (status, kind) in [
        (422, ErrorKind::Validation),
        (429, ErrorKind::RateLimited),
        (500, ErrorKind::Server),
    ] {
        let app = TestApp::new().await;
        app.mount_login_failure(status, "nope").await;

        let err = app
            .session
            .login(&LoginCredentials::new("alice", "x"), false)
            .await
            .unwrap_err();
        assert_eq!(err.kind, kind, "status {status}");
        assert!(!app.session.is_authenticated().await);
    }
}

#[tokio::test]
async fn test_malformed_success_is_a_server_error() {
    let app = TestApp::new().await;
    // A 200 with the user missing must not be trusted.
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "t1",
        })))
        .mount(&app.server)
        .await;

    let err = app
        .session
        .login(&LoginCredentials::new("alice", "x"), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Server);
    assert!(!app.session.is_authenticated().await);
}

#[tokio::test]
async fn test_empty_credentials_never_reach_the_server() {
    let app = TestApp::new().await;
    // No mock mounted: a request would fail loudly with a 404.

    let err = app
        .session
        .login(&LoginCredentials::new("", ""), false)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_logout_clears_locally_even_when_server_fails() {
    let app = TestApp::new().await;
    app.login_as("admin", true).await;
    // No /api/logout mock: the notification gets a 404 and is absorbed.

    app.session.logout().await;

    assert!(!app.session.is_authenticated().await);
    assert!(app.store.load().await.token.is_none());
}

#[tokio::test]
async fn test_logout_with_no_session_is_a_quiet_noop() {
    let app = TestApp::new().await;
    app.session.logout().await;
    app.session.logout().await;
    assert!(!app.session.is_authenticated().await);
}
