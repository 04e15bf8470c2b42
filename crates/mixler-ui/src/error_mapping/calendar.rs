use mixler_calendar::CalendarError as ExportError;
use mixler_core::{AppError, CalendarError, ConfigError};

use super::IntoAppError;

impl IntoAppError for ExportError {
    fn into_app_error(self) -> AppError {
        match self {
            ExportError::InvalidTimezone(tz) => {
                AppError::Config(ConfigError::Invalid(format!("Unknown timezone '{}'", tz)))
            }
            ExportError::InvalidFilename(name) => {
                AppError::Calendar(CalendarError::InvalidEvent(name))
            }
            ExportError::Io(e) => AppError::Calendar(CalendarError::DownloadFailed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_mapping() {
        let err = ExportError::Io(std::io::Error::other("disk full")).into_app_error();
        assert_eq!(err.user_message(), "The calendar file couldn't be saved.");

        let err = ExportError::InvalidFilename("../x.ics".into()).into_app_error();
        assert!(matches!(err, AppError::Calendar(CalendarError::InvalidEvent(_))));
    }
}
