use chrono_tz::Tz;
use mixler_core::{event_page_path, SiteConfig};

use crate::error::CalendarError;

/// Site-wide values baked into every export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Zone the event's wall-clock times are in.
    pub timezone: Tz,
    /// Public site root, used for the event page link.
    pub site_url: String,
    /// Right-hand side of generated UIDs.
    pub uid_domain: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::America::Edmonton,
            site_url: "https://staging.mixler.ca".to_string(),
            uid_domain: "mixler.ca".to_string(),
        }
    }
}

impl ExportSettings {
    pub fn from_config(site: &SiteConfig) -> Result<Self, CalendarError> {
        let timezone = site
            .timezone
            .parse::<Tz>()
            .map_err(|_| CalendarError::InvalidTimezone(site.timezone.clone()))?;

        Ok(Self {
            timezone,
            site_url: site.base_url.trim_end_matches('/').to_string(),
            uid_domain: site.uid_domain.clone(),
        })
    }

    /// Public page for an event.
    pub fn event_page_url(&self, slug: &str) -> String {
        format!("{}{}", self.site_url, event_page_path(slug))
    }
}
