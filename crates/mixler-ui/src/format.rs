//! Display formatting for prices, dates and times (en-US style).

use chrono::{NaiveDate, NaiveTime};

/// `2500` -> `"$25.00"`. Negative amounts keep the sign after the symbol.
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("${}{}.{:02}", sign, abs / 100, abs % 100)
}

/// `"Friday, March 15, 2024"`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// `"Mar 15, 2024"`
pub fn format_short_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `"7:30 PM"`
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}
