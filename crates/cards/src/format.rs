//! Display formatting for card values (en-US conventions).
//!
//! Nothing here fails: input that does not parse comes back unchanged.

use chrono::{DateTime, NaiveDate};

use crate::CardLocale;

/// Parse a calendar date or a full timestamp, placing timestamps in the
/// display offset.
fn parse_date(raw: &str, locale: &CardLocale) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&locale.offset).date_naive())
}

/// `January 1, 2024`
pub fn date(raw: &str, locale: &CardLocale) -> String {
    parse_date(raw, locale)
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `Monday, January 1, 2024`
pub fn long_date(raw: &str, locale: &CardLocale) -> String {
    parse_date(raw, locale)
        .map(|d| d.format("%A, %B %-d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `9:00 AM`
pub fn time(raw: &str, locale: &CardLocale) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&locale.offset).format("%-I:%M %p").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// US dollars with cents only when there are any: `$90,000`, `$12.5`.
pub fn usd(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    match frac {
        0 => format!("{sign}${grouped}"),
        f if f % 10 == 0 => format!("{sign}${grouped}.{}", f / 10),
        f => format!("{sign}${grouped}.{f:02}"),
    }
}

/// Shortest decimal form: `40`, `38.5`.
pub fn number(value: f64) -> String {
    value.to_string()
}

/// `38.5h`
pub fn hours(value: f64) -> String {
    format!("{}h", number(value))
}

/// One decimal place: `5.0`
pub fn tenths(value: f64) -> String {
    format!("{value:.1}")
}
