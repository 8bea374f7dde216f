//! Password-reset request flow.
//!
//! The reset completion view is gated on a reset request having actually
//! been submitted in this process; the guard reads that flag out of
//! [`ResetFlow`] as part of its snapshot instead of looking it up
//! mid-decision.

use tokio::sync::RwLock;
use tracing::{info, warn};

use portal_client::ApiClient;
use portal_core::{AppError, AppResult};

/// State of the reset flow, exported into the guard snapshot.
#[derive(Debug, Clone, Default)]
pub struct ResetState {
    /// A request was submitted (set even when the server rejected it, so
    /// the user sees the outcome on the reset view rather than bouncing).
    pub request_sent: bool,
    /// The username the request was submitted for.
    pub requested_username: Option<String>,
    /// Last server-supplied confirmation message.
    pub message: Option<String>,
}

/// Manages the password-reset request lifecycle.
#[derive(Debug)]
pub struct ResetFlow {
    /// The shared request pipeline.
    api: ApiClient,
    /// Flow state.
    state: RwLock<ResetState>,
}

impl ResetFlow {
    /// Create a reset flow over the shared pipeline.
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: RwLock::new(ResetState::default()),
        }
    }

    /// Submit a reset request for `username`.
    ///
    /// Marks the request as sent whether or not the server accepted it;
    /// the classified error is still returned for display.
    pub async fn request_reset(&self, username: &str) -> AppResult<()> {
        if username.trim().is_empty() {
            return Err(AppError::validation("username must not be empty"));
        }

        let result = self.api.request_reset(username).await;

        let mut state = self.state.write().await;
        state.request_sent = true;
        state.requested_username = Some(username.to_string());

        match result {
            Ok(outcome) => {
                state.message = outcome.message;
                info!(username, "Password reset requested");
                Ok(())
            }
            Err(e) => {
                warn!(username, error = %e, "Password reset request failed");
                Err(e)
            }
        }
    }

    /// Complete an approved reset with a new password.
    ///
    /// Requires a prior [`request_reset`](Self::request_reset) in this
    /// process; clears the flow state on success.
    pub async fn reset_password(&self, password: &str, confirmation: &str) -> AppResult<()> {
        if password.is_empty() {
            return Err(AppError::validation("password must not be empty"));
        }
        if password != confirmation {
            return Err(AppError::validation("password confirmation does not match"));
        }

        let username = self
            .state
            .read()
            .await
            .requested_username
            .clone()
            .ok_or_else(|| AppError::validation("no pending reset request"))?;

        self.api
            .reset_password(&username, password, confirmation)
            .await?;

        info!(username = %username, "Password reset completed");
        self.reset_state().await;
        Ok(())
    }

    /// Whether a reset request is pending in this process.
    pub async fn is_request_pending(&self) -> bool {
        self.state.read().await.request_sent
    }

    /// A copy of the flow state.
    pub async fn state(&self) -> ResetState {
        self.state.read().await.clone()
    }

    /// Drop all flow state.
    pub async fn reset_state(&self) {
        *self.state.write().await = ResetState::default();
    }
}
