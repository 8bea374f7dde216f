//! Typed wrappers for the consumed API endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use portal_core::types::{LoginCredentials, User};
use portal_core::{AppError, AppResult};

use super::client::ApiClient;

/// Successful login payload.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    /// Opaque bearer token.
    pub token: String,
    /// The authenticated user.
    pub user: User,
    /// Token expiry, if the server supplied one.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Outcome of a password-reset call.
#[derive(Debug, Clone)]
pub struct ResetOutcome {
    /// Server-supplied confirmation message, if any.
    pub message: Option<String>,
}

/// A 200 from `/login` is only trusted once both the token and the user
/// are present; anything else is a malformed success.
#[derive(Debug, Deserialize)]
struct RawLoginResponse {
    token: Option<String>,
    user: Option<User>,
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: Option<String>,
}

impl ApiClient {
    /// `POST /api/login` — authenticate with credentials.
    pub async fn login(&self, credentials: &LoginCredentials) -> AppResult<LoginResponse> {
        let response = self.post_json("/login", credentials).await?;

        let raw: RawLoginResponse = response
            .json()
            .await
            .map_err(|e| AppError::server(format!("Malformed login response: {e}")))?;

        match (raw.token, raw.user) {
            (Some(token), Some(user)) => {
                debug!(user_id = user.id, "Login response accepted");
                Ok(LoginResponse {
                    token,
                    user,
                    expires_at: raw.expires_at,
                })
            }
            _ => Err(AppError::server("Invalid response format")),
        }
    }

    /// `POST /api/logout` — best-effort server-side notification. The
    /// response body is ignored beyond success/failure.
    pub async fn logout(&self) -> AppResult<()> {
        self.post("/logout").await?;
        Ok(())
    }

    /// `POST /api/refresh` — token rotation. Available on the backend but
    /// not used by the core flows; profile refresh goes through
    /// [`current_user`](Self::current_user).
    pub async fn refresh_token(&self) -> AppResult<LoginResponse> {
        let response = self.post("/refresh").await?;

        let raw: RawLoginResponse = response
            .json()
            .await
            .map_err(|e| AppError::server(format!("Malformed refresh response: {e}")))?;

        match (raw.token, raw.user) {
            (Some(token), Some(user)) => Ok(LoginResponse {
                token,
                user,
                expires_at: raw.expires_at,
            }),
            _ => Err(AppError::server("Invalid response format")),
        }
    }

    /// `GET /api/user` — fetch the current user profile.
    pub async fn current_user(&self) -> AppResult<User> {
        let response = self.get("/user").await?;
        response
            .json()
            .await
            .map_err(|e| AppError::server(format!("Malformed user response: {e}")))
    }

    /// `POST /api/reset/request` — ask an administrator to approve a
    /// password reset for the given username.
    pub async fn request_reset(&self, username: &str) -> AppResult<ResetOutcome> {
        let response = self
            .post_json("/reset/request", &json!({ "username": username }))
            .await?;

        let body: MessageResponse = response.json().await.unwrap_or(MessageResponse {
            message: None,
        });
        Ok(ResetOutcome {
            message: body.message,
        })
    }

    /// `POST /api/reset/password` — complete an approved password reset.
    pub async fn reset_password(
        &self,
        username: &str,
        password: &str,
        password_confirmation: &str,
    ) -> AppResult<ResetOutcome> {
        let response = self
            .post_json(
                "/reset/password",
                &json!({
                    "username": username,
                    "password": password,
                    "password_confirmation": password_confirmation,
                }),
            )
            .await?;

        let body: MessageResponse = response.json().await.unwrap_or(MessageResponse {
            message: None,
        });
        Ok(ResetOutcome {
            message: body.message,
        })
    }
}
