//! Compose links for web calendars.

use mixler_core::EventRecord;
use url::form_urlencoded;

use crate::settings::ExportSettings;

const GOOGLE_RENDER_URL: &str = "https://calendar.google.com/calendar/render";
const OUTLOOK_COMPOSE_URL: &str = "https://outlook.live.com/calendar/0/action/compose";

const COMPACT_STAMP: &str = "%Y%m%dT%H%M%S";
const ISO_STAMP: &str = "%Y-%m-%dT%H:%M:%S";

/// Google Calendar "create event" link.
///
/// Without an end time the second half of `dates` is left empty and Google
/// picks the duration.
pub fn google_calendar_url(event: &EventRecord, settings: &ExportSettings) -> String {
    let start = event.event_date.and_time(event.start_time);
    let end = event
        .end_time
        .map(|t| event.event_date.and_time(t).format(COMPACT_STAMP).to_string())
        .unwrap_or_default();
    let dates = format!("{}/{}", start.format(COMPACT_STAMP), end);

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("action", "TEMPLATE")
        .append_pair("text", &event.title)
        .append_pair("dates", &dates)
        .append_pair("location", event.location_label())
        .append_pair("details", event.summary_text())
        .append_pair("ctz", settings.timezone.name())
        .finish();

    format!("{}?{}", GOOGLE_RENDER_URL, query)
}

/// Outlook.com compose link. A missing end time is sent as the start time.
pub fn outlook_calendar_url(event: &EventRecord, _settings: &ExportSettings) -> String {
    let start = event.event_date.and_time(event.start_time);
    let end = event
        .end_time
        .map(|t| event.event_date.and_time(t))
        .unwrap_or(start);

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("path", "/calendar/action/compose")
        .append_pair("rru", "addevent")
        .append_pair("subject", &event.title)
        .append_pair("startdt", &start.format(ISO_STAMP).to_string())
        .append_pair("enddt", &end.format(ISO_STAMP).to_string())
        .append_pair("location", event.location_label())
        .append_pair("body", event.short_description.as_deref().unwrap_or(""))
        .finish();

    format!("{}?{}", OUTLOOK_COMPOSE_URL, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_event;
    use std::collections::HashMap;

    fn params(link: &str) -> HashMap<String, String> {
        let url = url::Url::parse(link).unwrap();
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_google_link() {
        let link = google_calendar_url(&sample_event(), &ExportSettings::default());
        assert!(link.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE&"));

        let p = params(&link);
        assert_eq!(p["text"], "Speed Friending, Calgary");
        assert_eq!(p["dates"], "20240315T193000/20240315T220000");
        assert_eq!(p["location"], "123 4 St SW, Calgary");
        assert_eq!(p["details"], "Meet new people; no pressure");
        assert_eq!(p["ctz"], "America/Edmonton");
    }

    #[test]
    fn test_google_link_without_end_leaves_it_open() {
        let mut event = sample_event();
        event.end_time = None;
        event.short_description = None;
        event.location_address = None;

        let p = params(&google_calendar_url(&event, &ExportSettings::default()));
        assert_eq!(p["dates"], "20240315T193000/");
        assert_eq!(p["details"], "A longer description");
        assert_eq!(p["location"], "The Commons");
    }

    #[test]
    fn test_google_link_uses_configured_zone() {
        let settings = ExportSettings {
            timezone: chrono_tz::America::Toronto,
            ..ExportSettings::default()
        };
        let p = params(&google_calendar_url(&sample_event(), &settings));
        assert_eq!(p["ctz"], "America/Toronto");
    }

    #[test]
    fn test_outlook_link() {
        let link = outlook_calendar_url(&sample_event(), &ExportSettings::default());
        assert!(link.starts_with("https://outlook.live.com/calendar/0/action/compose?"));

        let p = params(&link);
        assert_eq!(p["path"], "/calendar/action/compose");
        assert_eq!(p["rru"], "addevent");
        assert_eq!(p["subject"], "Speed Friending, Calgary");
        assert_eq!(p["startdt"], "2024-03-15T19:30:00");
        assert_eq!(p["enddt"], "2024-03-15T22:00:00");
        assert_eq!(p["body"], "Meet new people; no pressure");
    }

    #[test]
    fn test_outlook_link_without_end_repeats_start() {
        let mut event = sample_event();
        event.end_time = None;
        event.short_description = None;
        event.location_address = None;
        event.location_name = None;

        let p = params(&outlook_calendar_url(&event, &ExportSettings::default()));
        assert_eq!(p["enddt"], p["startdt"]);
        // Outlook only ever gets the short description.
        assert_eq!(p["body"], "");
        assert_eq!(p["location"], "");
    }

    #[test]
    fn test_spaces_encode_as_plus() {
        let link = google_calendar_url(&sample_event(), &ExportSettings::default());
        assert!(link.contains("text=Speed+Friending%2C+Calgary"));
    }
}
