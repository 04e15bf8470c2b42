//! Backend-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Not signed in")]
    NoSession,

    /// The stored session could not be refreshed and was discarded.
    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Row not found: {0}")]
    NotFound(String),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl BackendError {
    /// User-friendly error message for page display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(msg) => msg.clone(),
            Self::NoSession => "Please log in to continue.".to_string(),
            Self::SessionExpired(_) => {
                "Your session has expired. Please log in again.".to_string()
            }
            Self::NotFound(_) => "We couldn't find what you were looking for.".to_string(),
            Self::RateLimited(secs) => format!("Too many requests. Please wait {} seconds.", secs),
            Self::Api { status, .. } if *status >= 500 => {
                "The server is having trouble. Please try again later.".to_string()
            }
            Self::Api { message, .. } => format!("Request failed: {}", message),
            Self::InvalidResponse(_) => "Received an unexpected response.".to_string(),
            Self::InvalidRequest(_) => "Something went wrong. Please try again.".to_string(),
            Self::InvalidUrl(_) => "The site is misconfigured.".to_string(),
            Self::Storage(_) => "Couldn't save your session.".to_string(),
            Self::Network(_) => "Network error. Check your connection.".to_string(),
        }
    }

    /// Whether this error means "no such row" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        let err = BackendError::Auth("Invalid login credentials".into());
        assert_eq!(err.user_message(), "Invalid login credentials");

        let err = BackendError::RateLimited(30);
        assert!(err.user_message().contains("30"));

        let err = BackendError::Api {
            status: 502,
            message: "bad gateway".into(),
        };
        assert!(err.user_message().contains("later"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(BackendError::NotFound("profiles".into()).is_not_found());
        assert!(!BackendError::NoSession.is_not_found());
    }
}
