//! Integration tests for guarded navigation through the router.

use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use portal_auth::Decision;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_anonymous_user_is_sent_to_login_from_protected_routes() {
    let app = TestApp::new().await;

    for target in ["/admin", "/superadmin", "/profile"] {
        let navigation = app.router.navigate(target).await;
        assert_eq!(navigation.decision, Decision::RedirectToLogin, "{target}");
        assert_eq!(navigation.to, "/login");
    }
    assert_eq!(app.router.current().await, "/login");
}

#[tokio::test]
async fn test_anonymous_user_may_browse_public_routes() {
    let app = TestApp::new().await;

    assert!(app.router.navigate("/").await.entered());
    assert!(app.router.navigate("/login").await.entered());
    assert!(app.router.navigate("/unauthorized").await.entered());
}

#[tokio::test]
async fn test_wrong_role_is_sent_to_unauthorized() {
    let app = TestApp::new().await;
    app.login_as("superadmin", false).await;

    let navigation = app.router.navigate("/admin/procurements").await;
    assert_eq!(navigation.decision, Decision::RedirectToUnauthorized);
    assert_eq!(navigation.to, "/unauthorized");

    // The superadmin's own area is still open.
    assert!(app.router.navigate("/superadmin/staff").await.entered());
}

#[tokio::test]
async fn test_authenticated_user_on_login_view_lands_at_role_home() {
    let app = TestApp::new().await;
    app.login_as("admin", false).await;

    let navigation = app.router.navigate("/login").await;
    assert_eq!(
        navigation.decision,
        Decision::RedirectToRoleHome("/admin".to_string())
    );
    assert_eq!(navigation.to, "/admin");
    assert_eq!(app.router.current().await, "/admin");
}

#[tokio::test]
async fn test_unknown_role_falls_back_to_root_home() {
    let app = TestApp::new().await;
    // A role the client does not know yet still authenticates.
    app.login_as("auditor", false).await;

    let navigation = app.router.navigate("/login").await;
    assert_eq!(navigation.to, "/");

    // But every role-gated area is off limits.
    let navigation = app.router.navigate("/admin").await;
    assert_eq!(navigation.decision, Decision::RedirectToUnauthorized);
}

#[tokio::test]
async fn test_unmatched_path_is_treated_as_public() {
    let app = TestApp::new().await;

    let navigation = app.router.navigate("/about").await;
    assert!(navigation.entered());
    assert_eq!(app.router.current().await, "/about");
}

#[tokio::test]
async fn test_reset_view_is_closed_until_a_request_is_submitted() {
    let app = TestApp::new().await;

    let navigation = app.router.navigate("/reset-password").await;
    assert_eq!(navigation.decision, Decision::RedirectToLogin);

    Mock::given(method("POST"))
        .and(path("/api/reset/request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Request forwarded for approval",
        })))
        .mount(&app.server)
        .await;
    app.reset.request_reset("alice").await.unwrap();

    assert!(app.router.navigate("/reset-password").await.entered());
}

#[tokio::test]
async fn test_reset_view_stays_open_after_a_rejected_request() {
    let app = TestApp::new().await;
    // No mock: the request fails server-side, but the flow still records
    // it so the user sees the outcome on the reset view.
    app.reset.request_reset("alice").await.unwrap_err();

    assert!(app.reset.is_request_pending().await);
    assert!(app.router.navigate("/reset-password").await.entered());
}

#[tokio::test]
async fn test_expiry_is_enforced_on_navigation() {
    let app = TestApp::new().await;
    // The server hands out a token that is already past its deadline;
    // login adopts it, the first guarded navigation throws it out.
    app.mount_login(
        "t1",
        "admin",
        Some(chrono::Utc::now() - chrono::Duration::seconds(1)),
    )
    .await;
    app.session
        .login(
            &portal_core::types::LoginCredentials::new("alice", "x"),
            false,
        )
        .await
        .unwrap();
    assert!(app.session.is_authenticated().await);

    let navigation = app.router.navigate("/admin").await;
    assert_eq!(navigation.decision, Decision::RedirectToLogin);

    // The guard's expiry check cleared the session, not just denied it.
    assert!(!app.session.is_authenticated().await);
    assert!(app.store.load().await.token.is_none());
}

#[tokio::test]
async fn test_navigation_records_origin_and_destination() {
    let app = TestApp::new().await;

    let navigation = app.router.navigate("/login").await;
    assert_eq!(navigation.from, "/");
    assert_eq!(navigation.to, "/login");

    let navigation = app.router.navigate("/admin").await;
    assert_eq!(navigation.from, "/login");
    assert_eq!(navigation.to, "/login");
}
