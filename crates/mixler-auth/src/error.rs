use mixler_backend::BackendError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Account was created but saving the phone number failed.
    #[error("Profile update after sign-up failed: {0}")]
    ProfileUpdate(#[source] BackendError),

    /// Signed in, but the profile row could not be read.
    #[error("Profile lookup failed: {0}")]
    ProfileLookup(#[source] BackendError),

    #[error("Invalid location URL: {0}")]
    InvalidLocation(String),
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend(e) => e.user_message(),
            Self::ProfileUpdate(_) => {
                "Your account was created, but we couldn't save your phone number.".to_string()
            }
            Self::ProfileLookup(_) => {
                "We couldn't load your profile. Please refresh.".to_string()
            }
            Self::InvalidLocation(_) => "Something went wrong. Please reload the page.".to_string(),
        }
    }

    /// The backend rejected the supplied credentials or token.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Backend(BackendError::Auth(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_message_passes_through() {
        let err: AuthError = BackendError::Auth("Invalid login credentials".into()).into();
        assert_eq!(err.user_message(), "Invalid login credentials");
        assert!(err.is_auth_failure());
    }

    #[test]
    fn test_profile_update_message() {
        let err = AuthError::ProfileUpdate(BackendError::Api {
            status: 500,
            message: "boom".into(),
        });
        assert!(err.user_message().contains("phone"));
        assert!(!err.is_auth_failure());
    }

    #[test]
    fn test_profile_lookup_message() {
        let err = AuthError::ProfileLookup(BackendError::Api {
            status: 500,
            message: "db down".into(),
        });
        assert_eq!(err.user_message(), "We couldn't load your profile. Please refresh.");
        assert!(!err.is_auth_failure());
    }
}
