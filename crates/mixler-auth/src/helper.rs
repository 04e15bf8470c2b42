//! Auth helper: session lookups, sign-in/up/out and page guards.
//!
//! Every call goes back to the backend. Nothing about the user or profile is
//! cached here.

use std::sync::Arc;

use mixler_backend::{
    AuthChangeEvent, BackendClient, Profile, ProfileUpdate, Session, SignInResponse,
    SignUpResponse, Subscription, User,
};

use crate::error::AuthError;
use crate::location::Location;

const PROFILES_TABLE: &str = "profiles";
const DEFAULT_LOGIN_PATH: &str = "/login.html";
const HOME_PATH: &str = "/";

/// Signed-in user merged with their profile row.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub user: User,
    /// `None` when the profile row does not exist (yet).
    pub profile: Option<Profile>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.profile.as_ref().is_some_and(Profile::is_admin)
    }

    /// Name to greet the user with: profile, then sign-up metadata, then email.
    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(|p| p.full_name.as_deref())
            .or_else(|| self.user.full_name())
            .or(self.user.email.as_deref())
            .unwrap_or("")
    }
}

/// Auth operations used by pages.
pub struct AuthHelper {
    backend: Arc<BackendClient>,
    location: Arc<dyn Location>,
    login_path: String,
}

impl AuthHelper {
    pub fn new(backend: Arc<BackendClient>, location: Arc<dyn Location>) -> Self {
        Self {
            backend,
            location,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }

    /// Page unauthenticated visitors are sent to.
    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    pub fn backend(&self) -> &Arc<BackendClient> {
        &self.backend
    }

    pub fn location(&self) -> &Arc<dyn Location> {
        &self.location
    }

    /// Current session. Backend failures are logged and read as signed out.
    pub async fn get_session(&self) -> Option<Session> {
        match self.backend.auth_get_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Session lookup failed: {}", e);
                None
            }
        }
    }

    /// Session user plus profile, or `None` when signed out.
    pub async fn get_current_user(&self) -> Result<Option<CurrentUser>, AuthError> {
        let Some(session) = self.get_session().await else {
            return Ok(None);
        };

        let profile = self
            .backend
            .from(PROFILES_TABLE)
            .select("*")
            .eq("id", &session.user.id)
            .maybe_single::<Profile>()
            .await
            .map_err(AuthError::ProfileLookup)?;

        if profile.is_none() {
            tracing::debug!("No profile row for user {}", session.user.id);
        }

        Ok(Some(CurrentUser {
            user: session.user,
            profile,
        }))
    }

    /// Create an account. A non-empty `phone` is saved on the profile row
    /// afterwards.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        phone: &str,
    ) -> Result<SignUpResponse, AuthError> {
        let response = self
            .backend
            .auth_sign_up(email, password, serde_json::json!({ "full_name": full_name }))
            .await?;

        if let Some(user) = &response.user {
            if !phone.is_empty() {
                self.backend
                    .from(PROFILES_TABLE)
                    .eq("id", &user.id)
                    .update(&ProfileUpdate {
                        full_name: Some(full_name.to_string()),
                        phone: Some(phone.to_string()),
                    })
                    .await
                    .map_err(AuthError::ProfileUpdate)?;
            }
        }

        Ok(response)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResponse, AuthError> {
        Ok(self.backend.auth_sign_in_with_password(email, password).await?)
    }

    /// Sign out and go to the home page. Stays put if sign-out fails.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.backend.auth_sign_out().await?;
        self.location.assign(HOME_PATH);
        Ok(())
    }

    /// True only when the profile's `is_admin` flag is literally `true`.
    pub async fn is_admin(&self) -> Result<bool, AuthError> {
        Ok(self
            .get_current_user()
            .await?
            .is_some_and(|user| user.is_admin()))
    }

    /// Guard for signed-in pages. Without a session, redirects to the login
    /// page with a `return` parameter and yields `None`.
    pub async fn require_auth(&self) -> Option<Session> {
        if let Some(session) = self.get_session().await {
            return Some(session);
        }

        let return_to = self.location.path_and_query();
        let target = format!(
            "{}?return={}",
            self.login_path,
            urlencoding::encode(&return_to)
        );
        tracing::info!("Not signed in, redirecting to login");
        self.location.assign(&target);
        None
    }

    /// Guard for admin pages. Signed-in non-admins are sent home.
    pub async fn require_admin(&self) -> Result<Option<Session>, AuthError> {
        let Some(session) = self.require_auth().await else {
            return Ok(None);
        };

        if !self.is_admin().await? {
            tracing::info!("User {} is not an admin, redirecting home", session.user.id);
            self.location.assign(HOME_PATH);
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Forward every auth transition to `callback`.
    pub fn on_auth_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(AuthChangeEvent, Option<Session>) + Send + Sync + 'static,
    {
        self.backend.auth_on_auth_state_change(callback)
    }
}
