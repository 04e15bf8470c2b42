//! Centralized error types for the Mixler site layer.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for toasts and form errors
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// Service crates keep their own error enums; the UI layer maps them into
/// this type. Use `user_message()` to get a display-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Calendar export error: {0}")]
    Calendar(#[from] CalendarError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Service-level errors that have no more specific category.
    #[error("Service error: {0}")]
    Service(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display on the page.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Auth(e) => e.user_message(),
            AppError::Calendar(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Service(_) => "Something went wrong. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::RateLimited(_) => "Too many requests. Please wait a moment.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(_) => "A required setting is missing. Check your settings.",
        }
    }
}

/// Authentication errors (sessions, credentials, account creation).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Session expired")]
    SessionExpired,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Sign-up failed: {0}")]
    SignUpFailed(String),

    #[error("Sign-out failed: {0}")]
    SignOutFailed(String),

    #[error("Profile unavailable: {0}")]
    ProfileUnavailable(String),
}

impl AuthError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::SessionExpired => "Your session has expired. Please log in again.",
            AuthError::NotSignedIn => "Please log in to continue.",
            AuthError::InvalidCredentials(_) => "Invalid email or password. Please try again.",
            AuthError::SignUpFailed(_) => "We couldn't create your account. Please try again.",
            AuthError::SignOutFailed(_) => "Log out failed. Please try again.",
            AuthError::ProfileUnavailable(_) => "We couldn't load your profile. Please refresh.",
        }
    }
}

/// Calendar export errors.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Invalid event data: {0}")]
    InvalidEvent(String),
}

impl CalendarError {
    pub fn user_message(&self) -> &'static str {
        match self {
            CalendarError::DownloadFailed(_) => "The calendar file couldn't be saved.",
            CalendarError::InvalidEvent(_) => "This event can't be added to a calendar yet.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors: Vec<AppError> = vec![
            NetworkError::Timeout.into(),
            ConfigError::Invalid("test".into()).into(),
            AuthError::SessionExpired.into(),
            CalendarError::DownloadFailed("disk full".into()).into(),
            AppError::Service("test".into()),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "empty message for {:?}", err);
        }
    }

    #[test]
    fn test_app_error_conversion() {
        let auth_err = AuthError::NotSignedIn;
        let app_err: AppError = auth_err.into();
        assert!(matches!(app_err, AppError::Auth(AuthError::NotSignedIn)));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Auth(AuthError::SessionExpired);
        assert_eq!(
            app_err.user_message(),
            "Your session has expired. Please log in again."
        );
    }

    #[test]
    fn test_server_error_message_depends_on_status() {
        let upstream = NetworkError::ServerError {
            status: 503,
            message: "unavailable".into(),
        };
        let client = NetworkError::ServerError {
            status: 400,
            message: "bad".into(),
        };
        assert!(upstream.user_message().contains("later"));
        assert!(!client.user_message().contains("later"));
    }
}
