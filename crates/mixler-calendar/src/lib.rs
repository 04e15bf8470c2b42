//! "Add to calendar" support for Mixler events.
//!
//! Provides Google and Outlook compose links plus an iCalendar file for
//! Apple Calendar and desktop clients.

pub mod download;
pub mod error;
pub mod ics;
pub mod links;
pub mod settings;

pub use download::{download_ics, DirectoryDownloads, DownloadSink, IcsDownload, ICS_MIME};
pub use error::CalendarError;
pub use ics::{escape_ics, generate_ics, generate_ics_stamped};
pub use links::{google_calendar_url, outlook_calendar_url};
pub use settings::ExportSettings;
