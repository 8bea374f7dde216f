//! Session lifecycle manager — login, logout, refresh, and expiry flows.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, info, warn};
use validator::Validate;

use portal_client::ApiClient;
use portal_core::events::SessionEvent;
use portal_core::types::{LoginCredentials, Role, SessionData, User};
use portal_core::{AppError, AppResult};
use portal_store::TokenStore;

/// The session fields plus the write epoch, guarded by one lock so a
/// check-and-apply is atomic.
#[derive(Debug, Default)]
struct SessionState {
    /// Bumped on every clear and every newly established session. A
    /// deferred write (profile refresh completing after a clear) is
    /// discarded when the epoch it captured has moved: clear always wins.
    epoch: u64,
    /// The authoritative session.
    data: SessionData,
}

/// The authoritative session state machine.
///
/// Sole writer of both the in-memory session and the token store. All
/// consumers (the request pipeline, the guard, the console) read through
/// snapshots; nothing else mutates session state.
pub struct SessionManager {
    /// Session fields behind a single lock.
    state: RwLock<SessionState>,
    /// Token persistence.
    store: Arc<TokenStore>,
    /// The shared request pipeline.
    api: ApiClient,
    /// Bus for lifecycle events.
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish()
    }
}

impl SessionManager {
    /// Create a manager over the given pipeline, store, and event bus.
    pub fn new(
        api: ApiClient,
        store: Arc<TokenStore>,
        events: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            state: RwLock::new(SessionState::default()),
            store,
            api,
            events,
        }
    }

    /// Restore a persisted session at process start.
    ///
    /// Runs the expiry check before adopting anything: a session that
    /// fails it is never adopted and both backends are cleared.
    pub async fn initialize(&self) {
        let restored = self.store.load().await;

        let (Some(token), Some(user)) = (restored.token.clone(), restored.user.clone()) else {
            debug!("No persisted session to restore");
            return;
        };

        if restored.is_expired(Utc::now()) {
            info!("Persisted session is expired, discarding");
            self.store.clear().await;
            return;
        }

        let mut state = self.state.write().await;
        state.epoch += 1;
        state.data = SessionData {
            token: Some(token),
            user: Some(user.clone()),
            expires_at: restored.expires_at,
            persistent: restored.persistent,
        };
        drop(state);

        info!(
            user_id = user.id,
            persistent = restored.persistent,
            "Session restored from storage"
        );
    }

    /// Perform the login flow:
    ///
    /// 1. Validate the credentials locally
    /// 2. Call the authentication endpoint
    /// 3. Persist the token into the backend selected by `remember_me`
    /// 4. Adopt the session into memory and announce it
    ///
    /// On any failure the session is cleared before the classified error
    /// is returned, so no partial token is ever retained. Concurrent
    /// calls are not coalesced; the caller is expected to disable the
    /// login action while one call is outstanding.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
        remember_me: bool,
    ) -> AppResult<SessionData> {
        credentials.validate().map_err(AppError::from)?;

        info!(username = %credentials.username, remember_me, "Login attempt");

        let response = match self.api.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                warn!(username = %credentials.username, error = %e, "Login failed");
                self.clear(None).await;
                return Err(e);
            }
        };

        self.store
            .save(
                &response.token,
                &response.user,
                response.expires_at,
                remember_me,
            )
            .await;

        let data = SessionData {
            token: Some(response.token),
            user: Some(response.user.clone()),
            expires_at: response.expires_at,
            persistent: remember_me,
        };

        let mut state = self.state.write().await;
        state.epoch += 1;
        state.data = data.clone();
        drop(state);

        info!(user_id = response.user.id, "Login successful");
        let _ = self.events.send(SessionEvent::Established {
            user_id: response.user.id,
            persistent: remember_me,
        });

        Ok(data)
    }

    /// Perform the logout flow: best-effort server notification, then an
    /// unconditional local clear. Never fails — leaving the session must
    /// always succeed locally even when the network call does not.
    pub async fn logout(&self) {
        let token_held = self.state.read().await.data.token.is_some();

        if token_held {
            if let Err(e) = self.api.logout().await {
                warn!(error = %e, "Logout notification failed, clearing locally anyway");
            }
        }

        self.clear(Some("logout")).await;
        info!("Logout completed");
    }

    /// Refetch the user profile and replace only the `user` field,
    /// persisting into whichever backend is currently active.
    ///
    /// Best-effort: a no-op without a token, and network failures are
    /// logged and absorbed rather than tearing down a valid session. A
    /// clear that lands while the request is in flight wins; the stale
    /// profile write is discarded via the epoch check.
    pub async fn refresh_user(&self) {
        let (token, epoch) = {
            let state = self.state.read().await;
            match &state.data.token {
                Some(token) => (token.clone(), state.epoch),
                None => return,
            }
        };

        let user = match self.api.current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Refresh user failed, keeping current profile");
                return;
            }
        };

        let mut state = self.state.write().await;
        if state.epoch != epoch {
            debug!("Session changed during profile refresh, discarding result");
            return;
        }
        state.data.user = Some(user.clone());
        let expires_at = state.data.expires_at;

        // Persist under the lock so the store cannot be resurrected by
        // this write racing a concurrent clear.
        let persistent = self.store.is_persistent_active().await;
        self.store
            .save(&token, &user, expires_at, persistent)
            .await;
        drop(state);

        debug!(user_id = user.id, "User profile refreshed");
        let _ = self
            .events
            .send(SessionEvent::Refreshed { user_id: user.id });
    }

    /// Enforce expiry: returns `true` while the session is usable.
    ///
    /// A side-effecting read by design — any consumer asking "is my
    /// session still valid" also gets the expired session cleared.
    pub async fn check_expiration(&self) -> bool {
        let expired = {
            let state = self.state.read().await;
            state.data.token.is_some() && state.data.is_expired(Utc::now())
        };

        if expired {
            info!("Session expired, clearing");
            self.clear(Some("expired")).await;
            return false;
        }
        true
    }

    /// Clear the session from memory and both storage backends.
    /// Idempotent; bumps the epoch so in-flight writes are discarded.
    pub async fn clear(&self, reason: Option<&str>) {
        {
            let mut state = self.state.write().await;
            state.epoch += 1;
            state.data = SessionData::default();
        }
        self.store.clear().await;

        if let Some(reason) = reason {
            let _ = self.events.send(SessionEvent::Cleared {
                reason: reason.to_string(),
            });
        }
    }

    /// A point-in-time copy of the session.
    pub async fn snapshot(&self) -> SessionData {
        self.state.read().await.data.clone()
    }

    /// Whether a token is currently held.
    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.data.is_authenticated()
    }

    /// The current user's role, if authenticated.
    pub async fn role(&self) -> Option<Role> {
        self.state.read().await.data.role()
    }

    /// The current user, if authenticated.
    pub async fn user(&self) -> Option<User> {
        self.state.read().await.data.user.clone()
    }
}
