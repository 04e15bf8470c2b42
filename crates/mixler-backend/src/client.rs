//! Hosted backend client: auth endpoints and session bookkeeping.

use std::sync::Arc;

use mixler_core::BackendConfig;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::instrument;

use crate::error::BackendError;
use crate::query::TableQuery;
use crate::storage::{MemorySessionStorage, SessionStorage};
use crate::types::*;

const AUTH_PATH: &str = "/auth/v1";
const AUTH_EVENT_CAPACITY: usize = 16;

/// Which API produced an error response; they report failures differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorScope {
    Auth,
    Table,
}

/// Connection to the hosted backend (project URL + public key).
///
/// Construct once at startup and share it by `Arc`; every component that
/// talks to the backend receives this handle explicitly.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
    storage: Arc<dyn SessionStorage>,
    auth_events: broadcast::Sender<AuthChange>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, BackendError> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| BackendError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(BackendError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let (auth_events, _) = broadcast::channel(AUTH_EVENT_CAPACITY);

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            storage: Arc::new(MemorySessionStorage::new()),
            auth_events,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        if !config.is_configured() {
            tracing::warn!("Backend credentials look like placeholders");
        }
        Self::new(&config.url, &config.anon_key)
    }

    /// Use a different session store (e.g. a file that survives restarts).
    pub fn with_storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn anon_key(&self) -> &str {
        &self.anon_key
    }

    /// Access token of the stored session, falling back to the anon key.
    pub(crate) fn bearer_token(&self) -> String {
        match self.storage.load() {
            Ok(Some(session)) => session.access_token,
            Ok(None) => self.anon_key.clone(),
            Err(e) => {
                tracing::warn!("Session storage unreadable, using anon key: {}", e);
                self.anon_key.clone()
            }
        }
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.base_url, AUTH_PATH, endpoint)
    }

    /// Start a query against a table of the REST API.
    pub fn from(&self, table: &str) -> TableQuery<'_> {
        TableQuery::new(self, table)
    }

    /// Current session, refreshing it first if the access token is about to
    /// expire.
    #[instrument(skip(self), level = "debug")]
    pub async fn auth_get_session(&self) -> Result<Option<Session>, BackendError> {
        let Some(session) = self.storage.load()? else {
            return Ok(None);
        };

        if !session.needs_refresh() {
            return Ok(Some(session));
        }

        if session.refresh_token.is_empty() {
            tracing::info!("Stored session expired without a refresh token");
            self.storage.clear()?;
            self.emit(AuthChangeEvent::SignedOut, None);
            return Ok(None);
        }

        match self.refresh_session(&session.refresh_token).await {
            Ok(refreshed) => Ok(Some(refreshed)),
            Err(e) => {
                tracing::warn!("Session refresh failed: {}", e);
                self.storage.clear()?;
                self.emit(AuthChangeEvent::SignedOut, None);
                Err(BackendError::SessionExpired(e.to_string()))
            }
        }
    }

    /// Create an account. `metadata` is stored as the user's metadata.
    #[instrument(skip(self, password, metadata), level = "info")]
    pub async fn auth_sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: serde_json::Value,
    ) -> Result<SignUpResponse, BackendError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": metadata,
        });

        let response = self
            .http
            .post(self.auth_url("/signup"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&body)
            .send()
            .await?;

        let payload: ApiSignUp = self.handle_response(response, ErrorScope::Auth).await?;

        match payload {
            ApiSignUp::Session(session) => {
                let session = session.with_absolute_expiry();
                self.storage.store(&session)?;
                self.emit(AuthChangeEvent::SignedIn, Some(session.clone()));
                tracing::info!("Signed up and signed in user {}", session.user.id);
                Ok(SignUpResponse {
                    user: Some(session.user.clone()),
                    session: Some(session),
                })
            }
            ApiSignUp::User(user) => {
                tracing::info!("Signed up user {} (confirmation pending)", user.id);
                Ok(SignUpResponse {
                    user: Some(user),
                    session: None,
                })
            }
        }
    }

    /// Establish a session from email and password.
    #[instrument(skip(self, password), level = "info")]
    pub async fn auth_sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, BackendError> {
        let response = self
            .http
            .post(self.auth_url("/token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let session: Session = self.handle_response(response, ErrorScope::Auth).await?;
        let session = session.with_absolute_expiry();

        self.storage.store(&session)?;
        self.emit(AuthChangeEvent::SignedIn, Some(session.clone()));
        tracing::info!("Signed in user {}", session.user.id);

        Ok(SignInResponse {
            user: session.user.clone(),
            session,
        })
    }

    /// End the session. The stored session is kept if the backend refuses.
    #[instrument(skip(self), level = "info")]
    pub async fn auth_sign_out(&self) -> Result<(), BackendError> {
        if let Some(session) = self.storage.load()? {
            let response = self
                .http
                .post(self.auth_url("/logout"))
                .header("apikey", &self.anon_key)
                .bearer_auth(&session.access_token)
                .send()
                .await?;

            let status = response.status().as_u16();
            // Tokens the backend no longer knows are already signed out.
            if !response.status().is_success() && !matches!(status, 401 | 403 | 404) {
                return Err(read_error(response, ErrorScope::Auth).await);
            }
        }

        self.storage.clear()?;
        self.emit(AuthChangeEvent::SignedOut, None);
        tracing::info!("Signed out");
        Ok(())
    }

    /// Register a listener for auth transitions.
    ///
    /// The callback first receives `INITIAL_SESSION` with the stored session,
    /// then every later transition. Must be called inside a tokio runtime.
    pub fn auth_on_auth_state_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(AuthChangeEvent, Option<Session>) + Send + Sync + 'static,
    {
        let mut rx = self.auth_events.subscribe();
        let initial = self.storage.load().unwrap_or_else(|e| {
            tracing::warn!("Session storage unreadable: {}", e);
            None
        });

        let handle = tokio::spawn(async move {
            callback(AuthChangeEvent::InitialSession, initial);
            loop {
                match rx.recv().await {
                    Ok(change) => callback(change.event, change.session),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Auth listener lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        Subscription { handle }
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, BackendError> {
        let response = self
            .http
            .post(self.auth_url("/token"))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        let session: Session = self.handle_response(response, ErrorScope::Auth).await?;
        let session = session.with_absolute_expiry();

        self.storage.store(&session)?;
        self.emit(AuthChangeEvent::TokenRefreshed, Some(session.clone()));
        tracing::debug!("Refreshed session for user {}", session.user.id);
        Ok(session)
    }

    fn emit(&self, event: AuthChangeEvent, session: Option<Session>) {
        // No listeners is fine.
        let _ = self.auth_events.send(AuthChange { event, session });
    }

    /// Helper to handle API responses and errors.
    pub(crate) async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        scope: ErrorScope,
    ) -> Result<T, BackendError> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|e| BackendError::InvalidResponse(format!("JSON parse error: {}", e)))
        } else {
            Err(read_error(response, scope).await)
        }
    }
}

/// Turn a non-2xx response into a typed error.
pub(crate) async fn read_error(response: reqwest::Response, scope: ErrorScope) -> BackendError {
    let status = response.status().as_u16();
    let retry_after = response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(60);

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .ok()
        .and_then(|body| body.best_message())
        .unwrap_or_else(|| {
            if text.is_empty() {
                format!("HTTP {}", status)
            } else {
                text.clone()
            }
        });

    match (scope, status) {
        (_, 429) => BackendError::RateLimited(retry_after),
        (ErrorScope::Auth, 400 | 401 | 403 | 422) => BackendError::Auth(message),
        (ErrorScope::Table, 401 | 403) => BackendError::Auth(message),
        (ErrorScope::Table, 406) => BackendError::NotFound(message),
        _ => BackendError::Api { status, message },
    }
}

/// Handle for an auth listener. Delivery stops when it is dropped or
/// [`Subscription::unsubscribe`] is called.
#[derive(Debug)]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
