//! Backend API types and data structures.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Refresh this many seconds before the access token actually expires.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

/// Backend-issued proof of an authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    /// Absolute expiry (unix seconds). Filled from `expires_in` when the
    /// backend omits it.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

impl Session {
    /// Fill in `expires_at` relative to now if the backend left it out.
    pub(crate) fn with_absolute_expiry(mut self) -> Self {
        if self.expires_at.is_none() && self.expires_in > 0 {
            self.expires_at = Some(Utc::now().timestamp() + self.expires_in);
        }
        self
    }

    /// True once the token is within the refresh margin of its expiry.
    pub fn needs_refresh(&self) -> bool {
        match self.expires_at {
            Some(at) => Utc::now().timestamp() >= at - EXPIRY_MARGIN_SECS,
            None => false,
        }
    }
}

/// Backend user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// `full_name` from sign-up metadata, if any.
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata.get("full_name").and_then(|v| v.as_str())
    }
}

/// Row of the `profiles` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Kept untyped: only a literal JSON `true` grants admin.
    #[serde(default)]
    pub is_admin: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Profile {
    pub fn is_admin(&self) -> bool {
        self.is_admin == serde_json::Value::Bool(true)
    }
}

/// Partial profile update.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Result of a sign-up call.
#[derive(Debug, Clone)]
pub struct SignUpResponse {
    pub user: Option<User>,
    /// Present only when the backend confirms accounts immediately.
    pub session: Option<Session>,
}

/// Result of a password sign-in.
#[derive(Debug, Clone)]
pub struct SignInResponse {
    pub user: User,
    pub session: Session,
}

/// Kind of auth transition reported to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

impl AuthChangeEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialSession => "INITIAL_SESSION",
            Self::SignedIn => "SIGNED_IN",
            Self::SignedOut => "SIGNED_OUT",
            Self::TokenRefreshed => "TOKEN_REFRESHED",
            Self::UserUpdated => "USER_UPDATED",
        }
    }
}

impl std::fmt::Display for AuthChangeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Broadcast payload for auth listeners.
#[derive(Debug, Clone)]
pub struct AuthChange {
    pub event: AuthChangeEvent,
    pub session: Option<Session>,
}

// API Response Types

/// `/signup` answers with a session when auto-confirm is on, else a bare user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ApiSignUp {
    Session(Session),
    User(User),
}

/// Error bodies differ between the auth and table APIs.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error_description: Option<String>,
    pub msg: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub fn best_message(&self) -> Option<String> {
        self.error_description
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.message.clone())
            .or_else(|| self.error.clone())
    }
}
