use mixler_backend::BackendError;
use mixler_core::error::ReqwestErrorExt;
use mixler_core::{AppError, AuthError, ConfigError, NetworkError};

use super::IntoAppError;

impl IntoAppError for BackendError {
    fn into_app_error(self) -> AppError {
        match self {
            BackendError::Auth(msg) => AppError::Auth(AuthError::InvalidCredentials(msg)),
            BackendError::NoSession => AppError::Auth(AuthError::NotSignedIn),
            BackendError::SessionExpired(_) => AppError::Auth(AuthError::SessionExpired),
            BackendError::NotFound(what) => AppError::Service(format!("Not found: {}", what)),
            BackendError::RateLimited(secs) => AppError::Network(NetworkError::RateLimited(secs)),
            BackendError::Api { status, message } => {
                AppError::Network(NetworkError::ServerError { status, message })
            }
            BackendError::InvalidResponse(msg) => {
                AppError::Network(NetworkError::InvalidResponse(msg))
            }
            BackendError::InvalidRequest(msg) => AppError::Service(msg),
            BackendError::InvalidUrl(msg) => AppError::Config(ConfigError::Invalid(msg)),
            BackendError::Storage(msg) => AppError::Service(msg),
            BackendError::Network(e) => AppError::Network(e.into_network_error()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_mapping() {
        let err = BackendError::Auth("Invalid login credentials".into()).into_app_error();
        assert!(matches!(err, AppError::Auth(AuthError::InvalidCredentials(_))));

        let err = BackendError::RateLimited(30).into_app_error();
        assert!(matches!(err, AppError::Network(NetworkError::RateLimited(30))));

        let err = BackendError::Api {
            status: 503,
            message: "unavailable".into(),
        }
        .into_app_error();
        assert_eq!(
            err.user_message(),
            "The server is experiencing issues. Please try again later."
        );

        let err = BackendError::SessionExpired("Invalid Refresh Token".into()).into_app_error();
        assert!(matches!(err, AppError::Auth(AuthError::SessionExpired)));
        assert_eq!(
            err.user_message(),
            "Your session has expired. Please log in again."
        );

        let err = BackendError::InvalidUrl("nope".into()).into_app_error();
        assert!(matches!(err, AppError::Config(ConfigError::Invalid(_))));
    }
}
