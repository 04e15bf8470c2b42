use mixler_auth::AuthError as HelperError;
use mixler_core::{AppError, AuthError};

use super::IntoAppError;

impl IntoAppError for HelperError {
    fn into_app_error(self) -> AppError {
        match self {
            HelperError::Backend(e) => e.into_app_error(),
            HelperError::ProfileUpdate(e) => AppError::Auth(AuthError::SignUpFailed(e.to_string())),
            HelperError::ProfileLookup(e) => {
                AppError::Auth(AuthError::ProfileUnavailable(e.to_string()))
            }
            HelperError::InvalidLocation(msg) => AppError::Service(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mixler_backend::BackendError;

    #[test]
    fn test_auth_mapping() {
        let err = HelperError::Backend(BackendError::NoSession).into_app_error();
        assert!(matches!(err, AppError::Auth(AuthError::NotSignedIn)));

        let err = HelperError::ProfileUpdate(BackendError::Api {
            status: 500,
            message: "boom".into(),
        })
        .into_app_error();
        assert!(matches!(err, AppError::Auth(AuthError::SignUpFailed(_))));

        let err = HelperError::ProfileLookup(BackendError::Api {
            status: 500,
            message: "db down".into(),
        })
        .into_app_error();
        assert!(matches!(err, AppError::Auth(AuthError::ProfileUnavailable(_))));
        assert_eq!(err.user_message(), "We couldn't load your profile. Please refresh.");
    }
}
