//! Integration tests for restore, expiry, invalidation, and the
//! clear-versus-refresh race.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use portal_core::events::SessionEvent;
use portal_store::{FileBackend, MemoryBackend, StorageBackend, StoredSession, TokenStore};

use crate::helpers::TestApp;

fn stored(token: &str, expires_at: Option<chrono::DateTime<Utc>>, remember_me: bool) -> StoredSession {
    StoredSession {
        token: token.to_string(),
        user: serde_json::from_value(TestApp::user_json("admin")).unwrap(),
        token_expires_at: expires_at,
        remember_me,
    }
}

#[tokio::test]
async fn test_expired_session_at_startup_is_never_adopted() {
    let app = TestApp::new().await;
    app.durable
        .save(&stored("stale", Some(Utc::now() - Duration::seconds(1)), true))
        .await;

    app.session.initialize().await;

    assert!(!app.session.is_authenticated().await);
    assert!(app.volatile.load().await.is_none());
    assert!(app.durable.load().await.is_none());
}

#[tokio::test]
async fn test_valid_session_is_restored_at_startup() {
    let app = TestApp::new().await;
    app.durable
        .save(&stored("t1", Some(Utc::now() + Duration::hours(1)), true))
        .await;

    app.session.initialize().await;

    let snapshot = app.session.snapshot().await;
    assert_eq!(snapshot.token.as_deref(), Some("t1"));
    assert!(snapshot.persistent);
    assert_eq!(snapshot.user.unwrap().username, "alice");
}

#[tokio::test]
async fn test_remember_me_survives_a_process_restart() {
    // A real file backend models the restart: two stores, one path.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let first = TokenStore::with_backends(
        Arc::new(MemoryBackend::new()),
        Arc::new(FileBackend::new(&path)),
    );
    let user = serde_json::from_value(TestApp::user_json("admin")).unwrap();
    first.save("t1", &user, None, true).await;

    let second = TokenStore::with_backends(
        Arc::new(MemoryBackend::new()),
        Arc::new(FileBackend::new(&path)),
    );
    let restored = second.load().await;
    assert_eq!(restored.token.as_deref(), Some("t1"));
    assert!(restored.persistent);

    // A volatile session would not have: nothing was written to disk.
    second.save("t2", &user, None, false).await;
    let third = TokenStore::with_backends(
        Arc::new(MemoryBackend::new()),
        Arc::new(FileBackend::new(&path)),
    );
    assert!(third.load().await.token.is_none());
}

#[tokio::test]
async fn test_check_expiration_is_a_side_effecting_read() {
    let app = TestApp::new().await;
    app.durable
        .save(&stored("t1", Some(Utc::now() + Duration::milliseconds(50)), true))
        .await;
    app.session.initialize().await;

    assert!(app.session.check_expiration().await);

    tokio::time::sleep(StdDuration::from_millis(60)).await;
    assert!(!app.session.check_expiration().await);

    // The failed check already cleared everything.
    assert!(!app.session.is_authenticated().await);
    assert!(app.durable.load().await.is_none());
}

#[tokio::test]
async fn test_mid_session_401_clears_and_redirects_to_login() {
    let app = TestApp::new().await;
    app.login_as("admin", false).await;
    assert!(app.router.navigate("/admin").await.entered());

    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&app.server)
        .await;

    let mut events = app.events.subscribe();
    app.session.refresh_user().await; // absorbed; signal emitted

    let path = match events.recv().await.unwrap() {
        SessionEvent::Invalidated { path } => path,
        other => panic!("expected invalidation, got {other:?}"),
    };
    app.router.handle_invalidation(&path).await;

    assert!(!app.session.is_authenticated().await);
    assert!(app.store.load().await.token.is_none());
    assert_eq!(app.router.current().await, "/login");

    // The next guarded navigation sees an anonymous session.
    let navigation = app.router.navigate("/admin").await;
    assert_eq!(navigation.to, "/login");
}

#[tokio::test]
async fn test_invalidation_watcher_enacts_redirect_end_to_end() {
    let app = TestApp::new().await;
    app.login_as("admin", false).await;
    app.router.navigate("/admin").await;
    Arc::clone(&app.router).spawn_invalidation_watcher(app.events.subscribe());

    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&app.server)
        .await;
    app.session.refresh_user().await;

    // The watcher runs on its own task; poll briefly.
    for _ in 0..50 {
        if app.router.current().await == "/login" {
            break;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }
    assert_eq!(app.router.current().await, "/login");
    assert!(!app.session.is_authenticated().await);
}

#[tokio::test]
async fn test_invalidation_burst_is_idempotent() {
    let app = TestApp::new().await;
    app.login_as("admin", false).await;
    app.router.navigate("/admin").await;

    // Several 401s in flight resolve to one clear and one redirect.
    for _ in 0..3 {
        app.router.handle_invalidation("/user").await;
    }

    assert!(!app.session.is_authenticated().await);
    assert_eq!(app.router.current().await, "/login");
}

#[tokio::test]
async fn test_refresh_user_replaces_only_the_profile() {
    let app = TestApp::new().await;
    app.login_as("admin", true).await;

    let mut updated = TestApp::user_json("admin");
    updated["name"] = serde_json::json!("Alice Renamed");
    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .mount(&app.server)
        .await;

    app.session.refresh_user().await;

    let snapshot = app.session.snapshot().await;
    assert_eq!(snapshot.user.unwrap().name, "Alice Renamed");
    assert_eq!(snapshot.token.as_deref(), Some("t1"));
    assert!(snapshot.persistent);

    // Persisted into the backend that was active.
    assert_eq!(app.durable.load().await.unwrap().user.name, "Alice Renamed");
}

#[tokio::test]
async fn test_refresh_failure_keeps_the_session_intact() {
    let app = TestApp::new().await;
    app.login_as("admin", false).await;
    // No /api/user mock: the refresh gets a 404 and is absorbed.

    app.session.refresh_user().await;

    let snapshot = app.session.snapshot().await;
    assert_eq!(snapshot.token.as_deref(), Some("t1"));
    assert!(snapshot.user.is_some());
}

#[tokio::test]
async fn test_clear_wins_over_an_in_flight_refresh() {
    let app = TestApp::new().await;
    app.login_as("admin", false).await;

    Mock::given(method("GET"))
        .and(path("/api/user"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(TestApp::user_json("admin"))
                .set_delay(StdDuration::from_millis(200)),
        )
        .mount(&app.server)
        .await;

    let session = Arc::clone(&app.session);
    let refresh = tokio::spawn(async move { session.refresh_user().await });

    // Log out while the profile request is still in flight.
    tokio::time::sleep(StdDuration::from_millis(50)).await;
    app.session.logout().await;
    refresh.await.unwrap();

    // The deferred write must not resurrect the cleared session.
    assert!(!app.session.is_authenticated().await);
    assert!(app.session.user().await.is_none());
    assert!(app.store.load().await.token.is_none());
}
