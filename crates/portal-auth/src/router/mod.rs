//! Navigation dispatch and the invalidation subscriber.
//!
//! The router owns the declared route table and the current location. It
//! consults the guard before every navigation and enacts the decision; a
//! redirected target load is abandoned, not resumed. It is also the
//! single subscriber that reacts to [`SessionEvent::Invalidated`] from
//! the request pipeline — the network layer itself never navigates.
//!
//! [`SessionEvent::Invalidated`]: portal_core::events::SessionEvent

use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tracing::{info, warn};

use portal_core::events::SessionEvent;
use portal_core::types::{LOGIN_PATH, Role, Route, UNAUTHORIZED_PATH};

use crate::guard::{Decision, RouteGuard};
use crate::session::SessionManager;

/// Result of a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Location before the attempt.
    pub from: String,
    /// Location actually entered.
    pub to: String,
    /// The guard decision that was enacted.
    pub decision: Decision,
}

impl Navigation {
    /// Whether the requested target was entered as-is.
    pub fn entered(&self) -> bool {
        self.decision == Decision::Allow
    }
}

/// Dispatches navigation intents through the guard.
pub struct Router {
    /// Declared routes.
    routes: Vec<Route>,
    /// Current location.
    current: RwLock<String>,
    /// The authorization guard.
    guard: RouteGuard,
    /// Session manager, cleared on invalidation signals.
    session: Arc<SessionManager>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.len())
            .finish()
    }
}

impl Router {
    /// Create a router starting at the application root.
    pub fn new(routes: Vec<Route>, guard: RouteGuard, session: Arc<SessionManager>) -> Self {
        Self {
            routes,
            current: RwLock::new("/".to_string()),
            guard,
            session,
        }
    }

    /// The console's route table.
    pub fn default_routes() -> Vec<Route> {
        vec![
            Route::public("/", "home"),
            Route::public(LOGIN_PATH, "login"),
            Route::public(UNAUTHORIZED_PATH, "unauthorized"),
            Route::reset_gated("/reset-password", "reset-password"),
            Route::role_gated("/admin", "admin-home", Role::Admin),
            Route::role_gated("/admin/procurements", "procurements", Role::Admin),
            Route::role_gated("/admin/applicants", "applicants", Role::Admin),
            Route::role_gated("/superadmin", "superadmin-home", Role::Superadmin),
            Route::role_gated("/superadmin/staff", "staff", Role::Superadmin),
            Route::role_gated("/superadmin/resets", "reset-requests", Role::Superadmin),
            Route::authenticated("/profile", "profile"),
        ]
    }

    /// The current location.
    pub async fn current(&self) -> String {
        self.current.read().await.clone()
    }

    /// Navigate to `path`, consulting the guard and enacting its
    /// decision. Paths with no declaration are treated as public.
    pub async fn navigate(&self, path: &str) -> Navigation {
        let target = self
            .routes
            .iter()
            .find(|route| route.path == path)
            .cloned()
            .unwrap_or_else(|| Route::public(path, "unmatched"));

        let decision = self.guard.evaluate(&target).await;
        let to = match &decision {
            Decision::Allow => target.path.clone(),
            Decision::RedirectToLogin => LOGIN_PATH.to_string(),
            Decision::RedirectToUnauthorized => UNAUTHORIZED_PATH.to_string(),
            Decision::RedirectToRoleHome(home) => home.clone(),
        };

        let mut current = self.current.write().await;
        let from = current.clone();
        *current = to.clone();
        drop(current);

        info!(%from, %to, ?decision, "Navigation");
        Navigation { from, to, decision }
    }

    /// React to a server-side invalidation: clear the session and move to
    /// the login view unless already there. Safe under bursts — both the
    /// clear and the redirect are idempotent.
    pub async fn handle_invalidation(&self, path: &str) {
        warn!(path, "Session invalidated by server");
        self.session.clear(Some("invalidated")).await;

        let mut current = self.current.write().await;
        if *current != LOGIN_PATH {
            *current = LOGIN_PATH.to_string();
        }
    }

    /// Subscribe to the event bus and enact invalidation signals until
    /// the bus closes.
    pub fn spawn_invalidation_watcher(
        self: Arc<Self>,
        mut events: broadcast::Receiver<SessionEvent>,
    ) -> tokio::task::JoinHandle<()> {
        let router = self;
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::Invalidated { path }) => {
                        router.handle_invalidation(&path).await;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Invalidation watcher lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
