//! The shared HTTP pipeline: bearer attachment and invalidation handling.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use portal_core::config::api::ApiConfig;
use portal_core::events::SessionEvent;
use portal_core::{AppError, AppResult};
use portal_store::TokenStore;

/// Shape of the backend's failure payloads.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// The shared request pipeline.
///
/// Cheap to clone; all server calls in the application go through one
/// instance so the interceptor contract holds uniformly.
#[derive(Clone)]
pub struct ApiClient {
    /// Underlying HTTP client with the configured timeout.
    http: reqwest::Client,
    /// Base URL including the `/api` prefix.
    base_url: String,
    /// Token source for the request phase.
    store: Arc<TokenStore>,
    /// Bus for invalidation signals.
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    /// Build the pipeline from configuration.
    pub fn new(
        config: &ApiConfig,
        store: Arc<TokenStore>,
        events: broadcast::Sender<SessionEvent>,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: format!("{}/api", config.base_url.trim_end_matches('/')),
            store,
            events,
        })
    }

    /// Absolute URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Issue a GET through the pipeline.
    pub(crate) async fn get(&self, path: &str) -> AppResult<reqwest::Response> {
        let request = self.http.get(self.url(path));
        self.execute(path, request).await
    }

    /// Issue a POST with a JSON body through the pipeline.
    pub(crate) async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> AppResult<reqwest::Response> {
        let request = self.http.post(self.url(path)).json(body);
        self.execute(path, request).await
    }

    /// Issue a bodyless POST through the pipeline.
    pub(crate) async fn post(&self, path: &str) -> AppResult<reqwest::Response> {
        let request = self.http.post(self.url(path));
        self.execute(path, request).await
    }

    /// Request phase: attach the bearer token if the store holds one.
    /// Response phase: inspect for the invalidation signal and classify
    /// failure statuses. All other statuses pass through unchanged.
    async fn execute(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> AppResult<reqwest::Response> {
        let request = match self.store.load().await.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(classify_transport)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // Fire the signal regardless of which endpoint produced the
            // 401; the subscriber's clear and redirect are idempotent.
            debug!(path, "Invalidation signal received");
            let _ = self.events.send(SessionEvent::Invalidated {
                path: path.to_string(),
            });
            return Err(AppError::invalid_credentials(
                self.failure_message(response, "Token rejected by server")
                    .await,
            ));
        }

        if status.is_success() {
            return Ok(response);
        }

        let error = match status {
            StatusCode::UNPROCESSABLE_ENTITY => AppError::validation(
                self.failure_message(response, "Submitted data is invalid")
                    .await,
            ),
            StatusCode::TOO_MANY_REQUESTS => AppError::rate_limited(
                self.failure_message(response, "Too many attempts, try again later")
                    .await,
            ),
            StatusCode::NOT_FOUND => AppError::not_found(
                self.failure_message(response, "Resource not found").await,
            ),
            _ => {
                let message = self
                    .failure_message(response, "Unexpected server response")
                    .await;
                warn!(path, status = %status, message, "Server error");
                AppError::server(message)
            }
        };
        Err(error)
    }

    /// Pull the backend's `message` field out of a failure body, falling
    /// back to a fixed description.
    async fn failure_message(&self, response: reqwest::Response, fallback: &str) -> String {
        match response.json::<ErrorBody>().await {
            Ok(ErrorBody {
                message: Some(message),
            }) if !message.is_empty() => message,
            _ => fallback.to_string(),
        }
    }
}

/// Map transport-level failures: no connectivity and timeouts are
/// `Network`, anything else is a server-side problem.
fn classify_transport(err: reqwest::Error) -> AppError {
    if err.is_timeout() || err.is_connect() {
        AppError::with_source(
            portal_core::error::ErrorKind::Network,
            "No connection to server",
            err,
        )
    } else {
        AppError::with_source(
            portal_core::error::ErrorKind::Server,
            format!("Request failed: {err}"),
            err,
        )
    }
}
