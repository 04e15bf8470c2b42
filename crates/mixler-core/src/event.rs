//! Ticketed event record as served by the `events` table.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::form_urlencoded;

/// Events dated on or after January 1st of this year are unscheduled
/// ("coming soon").
pub const COMING_SOON_YEAR: i32 = 2099;

/// Read-only projection of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub event_date: NaiveDate,
    #[serde(with = "wall_clock")]
    pub start_time: NaiveTime,
    #[serde(default, with = "wall_clock_opt")]
    pub end_time: Option<NaiveTime>,
    pub capacity: i64,
    #[serde(default)]
    pub tickets_sold: i64,
    pub price_cents: i64,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub location_address: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl EventRecord {
    /// Remaining tickets. Negative when oversold; not clamped.
    pub fn spots_left(&self) -> i64 {
        self.capacity - self.tickets_sold
    }

    pub fn is_sold_out(&self) -> bool {
        self.spots_left() <= 0
    }

    /// True for placeholder events parked on the far-future sentinel date.
    pub fn is_coming_soon(&self) -> bool {
        self.event_date.year() >= COMING_SOON_YEAR
    }

    /// Address if known, else venue name, else empty.
    pub fn location_label(&self) -> &str {
        non_empty(&self.location_address)
            .or_else(|| non_empty(&self.location_name))
            .unwrap_or("")
    }

    /// Short description if present, else the long one, else empty.
    pub fn summary_text(&self) -> &str {
        non_empty(&self.short_description)
            .or_else(|| non_empty(&self.description))
            .unwrap_or("")
    }
}

/// Site-relative link to an event page, `/event.html?slug=<slug>`.
pub fn event_page_path(slug: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("slug", slug)
        .finish();
    format!("/event.html?{}", query)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Parse `HH:MM` or `HH:MM:SS` wall-clock strings.
pub fn parse_wall_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

mod wall_clock {
    use super::*;

    pub fn serialize<S: Serializer>(time: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_wall_clock(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid wall-clock time: {raw}")))
    }
}

mod wall_clock_opt {
    use super::*;

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => s.serialize_some(&t.format("%H:%M").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => parse_wall_clock(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid wall-clock time: {raw}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: serde_json::Value) -> EventRecord {
        serde_json::from_value(json).unwrap()
    }

    fn base() -> serde_json::Value {
        serde_json::json!({
            "id": "evt-1",
            "slug": "trivia-night",
            "title": "Trivia Night",
            "event_date": "2024-03-15",
            "start_time": "19:30",
            "capacity": 40,
            "tickets_sold": 12,
            "price_cents": 2500
        })
    }

    #[test]
    fn test_deserialize_minimal_row() {
        let event = record(base());
        assert_eq!(event.start_time, NaiveTime::from_hms_opt(19, 30, 0).unwrap());
        assert_eq!(event.end_time, None);
        assert_eq!(event.spots_left(), 28);
        assert!(!event.is_sold_out());
        assert!(!event.is_coming_soon());
    }

    #[test]
    fn test_deserialize_postgres_time_with_seconds() {
        let mut json = base();
        json["start_time"] = "19:30:00".into();
        json["end_time"] = "22:00:00".into();
        let event = record(json);
        assert_eq!(event.end_time, NaiveTime::from_hms_opt(22, 0, 0));
    }

    #[test]
    fn test_rejects_garbage_time() {
        let mut json = base();
        json["start_time"] = "evening".into();
        assert!(serde_json::from_value::<EventRecord>(json).is_err());
    }

    #[test]
    fn test_oversold_is_sold_out() {
        let mut json = base();
        json["tickets_sold"] = 41.into();
        let event = record(json);
        assert_eq!(event.spots_left(), -1);
        assert!(event.is_sold_out());
    }

    #[test]
    fn test_sentinel_date_is_coming_soon() {
        let mut json = base();
        json["event_date"] = "2099-12-31".into();
        assert!(record(json).is_coming_soon());
    }

    #[test]
    fn test_location_and_summary_fallbacks() {
        let mut json = base();
        json["location_name"] = "The Den".into();
        json["description"] = "Long text".into();
        let event = record(json);
        assert_eq!(event.location_label(), "The Den");
        assert_eq!(event.summary_text(), "Long text");

        let mut json = base();
        json["location_name"] = "The Den".into();
        json["location_address"] = "123 4 St SW".into();
        json["short_description"] = "Short".into();
        let event = record(json);
        assert_eq!(event.location_label(), "123 4 St SW");
        assert_eq!(event.summary_text(), "Short");
    }

    #[test]
    fn test_event_page_path() {
        assert_eq!(event_page_path("trivia-night"), "/event.html?slug=trivia-night");
        assert_eq!(
            event_page_path("games & drinks #2"),
            "/event.html?slug=games+%26+drinks+%232"
        );
    }
}
