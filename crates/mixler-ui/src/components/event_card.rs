use mixler_core::{event_page_path, EventRecord};

use crate::format::{format_price, format_short_date, format_time};
use crate::html::escape_html;

const DATE_TBA: &str = "Date TBA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardState {
    Available,
    SoldOut,
    ComingSoon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Outline,
}

impl ButtonStyle {
    fn class(self) -> &'static str {
        match self {
            Self::Primary => "btn btn-primary",
            Self::Outline => "btn btn-outline",
        }
    }
}

/// Everything an event card shows, before it becomes markup.
#[derive(Debug, Clone, PartialEq)]
pub struct EventCardView {
    pub state: CardState,
    pub href: String,
    pub title: String,
    pub image_url: Option<String>,
    /// Price, "Sold Out" or "Coming Soon".
    pub tag: String,
    /// Date, time and venue pieces, joined by bullets when rendered.
    pub meta: Vec<String>,
    pub description: String,
    pub button_label: &'static str,
    pub button_style: ButtonStyle,
}

/// Card contents for one event.
pub fn render_event_card(event: &EventRecord) -> EventCardView {
    let state = if event.is_coming_soon() {
        CardState::ComingSoon
    } else if event.is_sold_out() {
        CardState::SoldOut
    } else {
        CardState::Available
    };

    let venue = event.location_name.clone().unwrap_or_default();
    let (tag, meta, button_label, button_style) = match state {
        CardState::ComingSoon => (
            "Coming Soon".to_string(),
            vec![DATE_TBA.to_string(), venue],
            "Learn More",
            ButtonStyle::Outline,
        ),
        CardState::SoldOut => (
            "Sold Out".to_string(),
            dated_meta(event, venue),
            "Join Waitlist",
            ButtonStyle::Outline,
        ),
        CardState::Available => (
            format_price(event.price_cents),
            dated_meta(event, venue),
            "Get Tickets",
            ButtonStyle::Primary,
        ),
    };

    EventCardView {
        state,
        href: event_page_path(&event.slug),
        title: event.title.clone(),
        image_url: event.image_url.clone().filter(|url| !url.is_empty()),
        tag,
        meta,
        description: event.short_description.clone().unwrap_or_default(),
        button_label,
        button_style,
    }
}

fn dated_meta(event: &EventRecord, venue: String) -> Vec<String> {
    vec![
        format_short_date(event.event_date),
        format_time(event.start_time),
        venue,
    ]
}

impl EventCardView {
    pub fn to_html(&self) -> String {
        let image_style = self
            .image_url
            .as_deref()
            .map(|url| {
                format!(
                    r#" style="background-image:url('{}');background-size:cover;background-position:center;""#,
                    escape_html(url)
                )
            })
            .unwrap_or_default();

        let meta = self
            .meta
            .iter()
            .map(|part| escape_html(part))
            .collect::<Vec<_>>()
            .join(" &bull; ");

        format!(
            r#"
    <div class="event-card">
      <div class="event-image"{image_style}></div>
      <div class="event-content">
        <span class="event-tag">{tag}</span>
        <h3>{title}</h3>
        <div class="event-meta">{meta}</div>
        <p class="event-short-desc">{description}</p>
        <a href="{href}" class="{button_class}">{button_label}</a>
      </div>
    </div>
  "#,
            image_style = image_style,
            tag = escape_html(&self.tag),
            title = escape_html(&self.title),
            meta = meta,
            description = escape_html(&self.description),
            href = escape_html(&self.href),
            button_class = self.button_style.class(),
            button_label = self.button_label,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn event() -> EventRecord {
        EventRecord {
            id: "evt-1".to_string(),
            slug: "trivia-night".to_string(),
            title: "Trivia Night".to_string(),
            short_description: Some("Bring your smartest friends".to_string()),
            description: None,
            event_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            start_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
            end_time: None,
            capacity: 30,
            tickets_sold: 10,
            price_cents: 2500,
            location_name: Some("The Commons".to_string()),
            location_address: None,
            image_url: Some("https://cdn.mixler.ca/trivia.jpg".to_string()),
        }
    }

    #[test]
    fn test_available_card() {
        let view = render_event_card(&event());

        assert_eq!(view.state, CardState::Available);
        assert_eq!(view.tag, "$25.00");
        assert_eq!(view.meta, vec!["Mar 15, 2024", "7:30 PM", "The Commons"]);
        assert_eq!(view.button_label, "Get Tickets");
        assert_eq!(view.button_style, ButtonStyle::Primary);
        assert_eq!(view.href, "/event.html?slug=trivia-night");

        let html = view.to_html();
        assert!(html.contains(r#"<span class="event-tag">$25.00</span>"#));
        assert!(html.contains("Mar 15, 2024 &bull; 7:30 PM &bull; The Commons"));
        assert!(html.contains("background-image:url('https://cdn.mixler.ca/trivia.jpg')"));
        assert!(html.contains(r#"class="btn btn-primary">Get Tickets</a>"#));
    }

    #[test]
    fn test_sold_out_card_has_no_ticket_button() {
        for sold in [30, 31] {
            let mut e = event();
            e.tickets_sold = sold;

            let view = render_event_card(&e);
            assert_eq!(view.state, CardState::SoldOut);
            assert_eq!(view.tag, "Sold Out");
            assert_eq!(view.button_label, "Join Waitlist");
            assert!(!view.to_html().contains("Get Tickets"));
        }
    }

    #[test]
    fn test_coming_soon_card_has_no_date() {
        let mut e = event();
        e.event_date = NaiveDate::from_ymd_opt(2099, 1, 1).unwrap();
        e.tickets_sold = 99;

        let view = render_event_card(&e);
        assert_eq!(view.state, CardState::ComingSoon);
        assert_eq!(view.tag, "Coming Soon");
        assert_eq!(view.meta, vec!["Date TBA", "The Commons"]);
        assert_eq!(view.button_label, "Learn More");
        assert_eq!(view.button_style, ButtonStyle::Outline);

        let html = view.to_html();
        assert!(!html.contains("2099"));
        assert!(!html.contains("Get Tickets"));
    }

    #[test]
    fn test_missing_optional_fields() {
        let mut e = event();
        e.image_url = None;
        e.short_description = None;
        e.location_name = None;

        let view = render_event_card(&e);
        let html = view.to_html();
        assert!(html.contains(r#"<div class="event-image"></div>"#));
        assert!(html.contains(r#"<p class="event-short-desc"></p>"#));
        assert_eq!(view.meta.last().map(String::as_str), Some(""));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut e = event();
        e.title = "<script>alert('x')</script>".to_string();

        let html = render_event_card(&e).to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_slug_is_encoded_in_link() {
        let mut e = event();
        e.slug = "games&drinks#2".to_string();

        let view = render_event_card(&e);
        assert_eq!(view.href, "/event.html?slug=games%26drinks%232");
        assert!(view.to_html().contains(r#"href="/event.html?slug=games%26drinks%232""#));
    }
}
