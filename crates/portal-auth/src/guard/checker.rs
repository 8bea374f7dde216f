//! The navigation decision procedure.
//!
//! [`decide`] is a pure function over a fully-resolved snapshot: no
//! lookups happen mid-decision. [`RouteGuard::evaluate`] assembles that
//! snapshot — enforcing expiry first, then collecting any auxiliary
//! state the decision needs (the pending password-reset flag).

use std::sync::Arc;

use chrono::{DateTime, Utc};

use portal_core::types::{LOGIN_PATH, Route, SessionData};

use crate::reset::ResetFlow;
use crate::session::SessionManager;

/// Outcome of a guard evaluation, enacted by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Enter the requested route.
    Allow,
    /// Anonymous session on a protected route.
    RedirectToLogin,
    /// Authenticated, but the role does not match.
    RedirectToUnauthorized,
    /// Already authenticated and heading for the login view; go to the
    /// role's home instead.
    RedirectToRoleHome(String),
}

/// Everything the decision consumes, resolved up front.
#[derive(Debug, Clone, Default)]
pub struct GuardSnapshot {
    /// The current session.
    pub session: SessionData,
    /// Whether a password-reset request is pending (gates the reset
    /// completion view).
    pub reset_requested: bool,
}

/// Decide whether `target` may be entered given `snapshot`, as of `now`.
///
/// The ordering is deliberate, first match wins:
///
/// 1. an expired token counts as anonymous — never valid, not even
///    transiently;
/// 2. authentication before role-matching — an anonymous user goes to
///    login, not to "unauthorized";
/// 3. role mismatch redirects to the unauthorized view;
/// 4. the reset completion view requires a pending reset request;
/// 5. the login view redirects an authenticated user to their role home
///    (evaluated last so it never overrides a required redirect);
/// 6. otherwise, allow.
pub fn decide(target: &Route, snapshot: &GuardSnapshot, now: DateTime<Utc>) -> Decision {
    let session = &snapshot.session;
    let anonymous = !session.is_authenticated() || session.is_expired(now);

    if target.requirement.requires_auth && anonymous {
        return Decision::RedirectToLogin;
    }

    if let Some(required) = target.requirement.role {
        let role = if anonymous { None } else { session.role() };
        if role != Some(required) {
            return Decision::RedirectToUnauthorized;
        }
    }

    if target.requirement.requires_reset_request && !snapshot.reset_requested {
        return Decision::RedirectToLogin;
    }

    if target.path == LOGIN_PATH && !anonymous {
        let home = session
            .role()
            .map(|role| role.home_path())
            .unwrap_or("/");
        return Decision::RedirectToRoleHome(home.to_string());
    }

    Decision::Allow
}

/// Guard evaluated before every navigation.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    /// Session source; its expiry check runs before every decision.
    session: Arc<SessionManager>,
    /// Auxiliary reset-request state.
    reset: Arc<ResetFlow>,
}

impl RouteGuard {
    /// Create a guard over the session manager and reset flow.
    pub fn new(session: Arc<SessionManager>, reset: Arc<ResetFlow>) -> Self {
        Self { session, reset }
    }

    /// Evaluate the guard for a target route.
    ///
    /// Expiry is enforced first (`check_expiration` clears an expired
    /// session as a side effect), then the pure decision runs over the
    /// resulting snapshot.
    pub async fn evaluate(&self, target: &Route) -> Decision {
        self.session.check_expiration().await;

        let snapshot = GuardSnapshot {
            session: self.session.snapshot().await,
            reset_requested: self.reset.is_request_pending().await,
        };

        decide(target, &snapshot, Utc::now())
    }
}
