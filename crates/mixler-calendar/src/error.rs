use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Unknown timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid download filename: {0}")]
    InvalidFilename(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CalendarError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidTimezone(_) => "Calendar export is misconfigured.",
            Self::InvalidFilename(_) => "This event can't be added to a calendar.",
            Self::Io(_) => "The calendar file couldn't be saved.",
        }
    }
}
