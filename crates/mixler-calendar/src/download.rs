//! Handing a generated `.ics` file to the user.

use std::fs;
use std::path::{Path, PathBuf};

use mixler_core::EventRecord;

use crate::error::CalendarError;
use crate::ics::generate_ics;
use crate::settings::ExportSettings;

pub const ICS_MIME: &str = "text/calendar;charset=utf-8";

/// A file ready to be saved by the user agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcsDownload {
    pub filename: String,
    pub mime: &'static str,
    pub body: String,
}

/// Somewhere downloads end up (browser save dialog, a directory, ...).
pub trait DownloadSink: Send + Sync {
    fn deliver(&self, download: &IcsDownload) -> Result<(), CalendarError>;
}

/// Writes downloads into a directory, overwriting same-named files.
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
}

impl DirectoryDownloads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `filename` lands. Rejects anything that is not a bare file name.
    pub fn path_for(&self, filename: &str) -> Result<PathBuf, CalendarError> {
        let is_bare = !filename.is_empty()
            && !filename.starts_with('.')
            && !filename.contains(&['/', '\\'][..])
            && Path::new(filename).file_name().is_some();
        if !is_bare {
            return Err(CalendarError::InvalidFilename(filename.to_string()));
        }
        Ok(self.dir.join(filename))
    }
}

impl DownloadSink for DirectoryDownloads {
    fn deliver(&self, download: &IcsDownload) -> Result<(), CalendarError> {
        let path = self.path_for(&download.filename)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, &download.body)?;
        tracing::info!("Saved calendar file to {:?}", path);
        Ok(())
    }
}

/// Generate the calendar file for `event` and hand it to `sink` as
/// `<slug>.ics`.
pub fn download_ics(
    event: &EventRecord,
    settings: &ExportSettings,
    sink: &dyn DownloadSink,
) -> Result<IcsDownload, CalendarError> {
    let download = IcsDownload {
        filename: format!("{}.ics", event.slug),
        mime: ICS_MIME,
        body: generate_ics(event, settings),
    };
    sink.deliver(&download)?;
    Ok(download)
}
