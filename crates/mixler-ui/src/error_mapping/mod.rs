//! Maps service errors to mixler_core::AppError for consistent user-facing messages.
//! Each service has its own module to keep mappings small and readable.

mod auth;
mod backend;
mod calendar;

use mixler_core::AppError;

/// Conversion into the application-wide error type.
///
/// A trait rather than `From` impls because both sides live in other crates.
pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}
