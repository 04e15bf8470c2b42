//! iCalendar (RFC 5545) body for a single event.

use chrono::{DateTime, NaiveDateTime, Utc};
use icalendar::{Calendar, Component, EventLike, Property};
use mixler_core::EventRecord;

use crate::settings::ExportSettings;

const PRODID: &str = "-//Mixler//Events//EN";
const LOCAL_STAMP: &str = "%Y%m%dT%H%M%S";
const UTC_STAMP: &str = "%Y%m%dT%H%M%SZ";

/// Escape a TEXT value: backslash-prefix `,` `;` `\` and turn newlines into `\n`.
///
/// The calendar writer applies the same escaping to SUMMARY, DESCRIPTION and
/// LOCATION, so values handed to it stay raw.
pub fn escape_ics(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ',' | ';' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Calendar file for `event`. Times are local to the configured zone; a
/// missing end time ends the event at its start.
pub fn generate_ics(event: &EventRecord, settings: &ExportSettings) -> String {
    generate_ics_stamped(event, settings, Utc::now())
}

/// Same as [`generate_ics`] with an explicit DTSTAMP.
pub fn generate_ics_stamped(
    event: &EventRecord,
    settings: &ExportSettings,
    stamped_at: DateTime<Utc>,
) -> String {
    let tzid = settings.timezone.name();
    let start = event.event_date.and_time(event.start_time);
    let end = event
        .end_time
        .map(|t| event.event_date.and_time(t))
        .unwrap_or(start);

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&format!("{}@{}", event.id, settings.uid_domain));
    ics_event.add_property("DTSTAMP", stamped_at.format(UTC_STAMP).to_string());
    add_zoned_property(&mut ics_event, "DTSTART", start, tzid);
    add_zoned_property(&mut ics_event, "DTEND", end, tzid);
    ics_event.summary(&event.title);
    ics_event.description(event.summary_text());
    ics_event.location(event.location_label());
    ics_event.url(&settings.event_page_url(&event.slug));

    let mut calendar = Calendar::empty();
    calendar
        .append_property(Property::new("VERSION", "2.0"))
        .append_property(Property::new("PRODID", PRODID))
        .append_property(Property::new("CALSCALE", "GREGORIAN"))
        .push(ics_event.done());

    calendar.done().to_string()
}

fn add_zoned_property(
    ics_event: &mut icalendar::Event,
    name: &str,
    local: NaiveDateTime,
    tzid: &str,
) {
    let mut prop = Property::new(name, local.format(LOCAL_STAMP).to_string());
    prop.add_parameter("TZID", tzid);
    ics_event.append_property(prop);
}
